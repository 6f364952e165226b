//! End-to-end donor scenarios through `waqf_pipeline::run`.

use waqf_core::{AllocationMode, Cause, Params, Portfolio, WaqfType::*, WaqfTypeSplit, EQUAL_SPLIT_FALLBACK};
use waqf_pipeline::{run, validate::*, Request};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 0.005
}

fn two_causes(total: f64) -> Portfolio {
    let causes = [
        Cause::new("A".parse().unwrap(), "Orphan Care", [Permanent, TemporaryConsumable]),
        Cause::new("B".parse().unwrap(), "Microloans", [TemporaryRevolving]),
    ];
    Portfolio::from_causes(causes, total, &Params::default())
}

#[test]
fn balanced_mix_over_partial_supporters() {
    let out = run(&two_causes(1000.0), None, Request::Balanced { global: WaqfTypeSplit::new(40.0, 30.0, 30.0) }).unwrap();
    let a = &out.portfolio.items[0];
    let b = &out.portfolio.items[1];

    assert!(close(a.total_amount, 700.0));
    assert!(close(b.total_amount, 300.0));
    assert!(close(a.allocation[Permanent], 57.14));
    assert!(close(a.allocation[TemporaryConsumable], 42.86));
    assert_eq!(a.allocation[TemporaryRevolving], 0.0);
    assert_eq!(b.allocation, WaqfTypeSplit::only(TemporaryRevolving));
    assert!(out.report.pass);
    assert!(out.report.issues.is_empty());
}

#[test]
fn simple_with_non_supporting_cause() {
    let p = Portfolio::from_causes(
        [Cause::new("lonely".parse().unwrap(), "Lonely", [] as [waqf_core::WaqfType; 0])],
        500.0,
        &Params::default(),
    );
    let out = run(&p, None, Request::Simple { waqf_type: Permanent }).unwrap();
    assert_eq!(out.portfolio.items[0].total_amount, 0.0);
    assert_eq!(out.portfolio.items[0].allocation, EQUAL_SPLIT_FALLBACK);
    assert!(!out.report.pass);
    assert!(out.report.has_code(SIMPLE_UNSUPPORTED_TYPE));
}

#[test]
fn slider_drag_rebalances_others() {
    let start = run(&two_causes(1000.0), None, Request::Balanced { global: WaqfTypeSplit::new(40.0, 30.0, 30.0) })
        .unwrap()
        .portfolio;
    let out = run(&start, None, Request::AdjustSlider { waqf_type: Permanent, value: 70.0 }).unwrap();
    assert_eq!(
        out.portfolio.allocation_mode,
        AllocationMode::Balanced { global_allocation: WaqfTypeSplit::new(70.0, 15.0, 15.0) }
    );
    // weight(A) = 85, weight(B) = 15
    assert!(close(out.portfolio.items[0].total_amount, 850.0));
}

#[test]
fn slider_to_maximum_clamps_others_at_zero() {
    let start = run(&two_causes(1000.0), None, Request::Balanced { global: WaqfTypeSplit::new(90.0, 5.0, 5.0) })
        .unwrap()
        .portfolio;
    let out = run(&start, None, Request::AdjustSlider { waqf_type: Permanent, value: 100.0 }).unwrap();
    let global = match out.portfolio.allocation_mode {
        AllocationMode::Balanced { global_allocation } => global_allocation,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(global, WaqfTypeSplit::new(100.0, 0.0, 0.0));
    // B accepts no permanent money: weights 100 vs 0.
    assert_eq!(out.portfolio.items[1].total_amount, 0.0);
}

#[test]
fn advanced_overfull_cause_is_reported_not_corrected() {
    let a = "A".parse().unwrap();
    let p = run(&two_causes(1000.0), None, Request::Advanced).unwrap().portfolio;
    let p = run(&p, None, Request::SetCauseAllocation { cause: a, waqf_type: Permanent, percent: 60.0 })
        .unwrap()
        .portfolio;
    let a = "A".parse().unwrap();
    let out = run(&p, None, Request::SetCauseAllocation { cause: a, waqf_type: TemporaryConsumable, percent: 50.0 })
        .unwrap();

    let item = &out.portfolio.items[0];
    assert_eq!(item.allocation, WaqfTypeSplit::new(60.0, 50.0, 0.0));
    assert_eq!(item.total_amount, 500.0);
    assert_eq!(out.portfolio.items[1].total_amount, 500.0);

    let errors: Vec<&ValidationIssue> = out.report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ADVANCED_CAUSE_NOT_100);
    assert!(errors[0].message.contains("Orphan Care"));
}

#[test]
fn advanced_share_drift_is_reported() {
    let p = run(&two_causes(1000.0), None, Request::Advanced).unwrap().portfolio;
    let out = run(&p, None, Request::SetShare { cause: "B".parse().unwrap(), percent: 30.0 }).unwrap();
    assert_eq!(out.portfolio.items[1].total_amount, 300.0);
    assert_eq!(out.portfolio.items[0].total_amount, 500.0);
    assert!(out.report.has_code(ADVANCED_SHARE_NOT_100));
    assert!(!out.report.pass);
}

#[test]
fn leaving_advanced_drops_shares() {
    let p = run(&two_causes(1000.0), None, Request::Advanced).unwrap().portfolio;
    assert!(p.portfolio_share(&"A".parse().unwrap()).is_some());
    let out = run(&p, None, Request::Simple { waqf_type: TemporaryRevolving }).unwrap();
    assert_eq!(out.portfolio.portfolio_share(&"A".parse().unwrap()), None);
    assert_eq!(out.portfolio.items[1].total_amount, 1000.0);
}

#[test]
fn inputs_are_never_mutated() {
    let p = two_causes(1000.0);
    let before = p.clone();
    let _ = run(&p, None, Request::Advanced).unwrap();
    let _ = run(&p, None, Request::Simple { waqf_type: Permanent }).unwrap();
    assert_eq!(p, before);
}
