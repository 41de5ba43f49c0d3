use audit_core::classify::{classify_memory, classify_processor, classify_storage};
use audit_core::model::{Brand, ClassifiedProcessor};
use audit_core::rules::{
    evaluate_memory, evaluate_processor, evaluate_storage, FamilyRule, RuleSet,
};

fn cpu(family: &str, generation: Option<&str>, speed: Option<f64>) -> ClassifiedProcessor {
    ClassifiedProcessor {
        original_text: String::new(),
        brand: Brand::Intel,
        family: family.to_string(),
        model_number: None,
        generation: generation.map(|g| g.to_string()),
        architecture_suffix: None,
        clock_speed_ghz: speed,
        extra_info: None,
        normalized_label: String::new(),
    }
}

/// Spec scenario: a default-policy i5-8500 at 3.0 GHz is compliant.
#[test]
fn default_policy_accepts_modern_i5() {
    let rules = RuleSet::default();
    let result = classify_processor("Intel(R) Core(TM) i5-8500 @ 3.00GHz");
    let verdict = evaluate_processor(result.value(), &rules);
    assert!(verdict.passes, "unexpected failure: {}", verdict.reason);
    assert!(verdict.reason.is_empty());
}

/// Spec scenario: a Ryzen 5 2600 with no detectable speed fails on the
/// speed threshold (2nd Gen does not qualify for the relaxed 3.5 GHz rule).
#[test]
fn default_policy_rejects_slow_ryzen_5() {
    let rules = RuleSet::default();
    let result = classify_processor("AMD Ryzen 5 2600");
    let verdict = evaluate_processor(result.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("clock speed"), "reason was: {}", verdict.reason);
    assert!(verdict.reason.contains("3.7"), "reason was: {}", verdict.reason);
}

/// From 3rd Gen onward the relaxed Ryzen 5 speed threshold applies.
#[test]
fn ryzen_5_relaxation_from_third_generation() {
    let rules = RuleSet::default();

    let third_gen = cpu("Ryzen 5", Some("3rd Gen"), Some(3.6));
    assert!(evaluate_processor(&third_gen, &rules).passes);

    let second_gen = cpu("Ryzen 5", Some("2nd Gen"), Some(3.6));
    assert!(!evaluate_processor(&second_gen, &rules).passes);
}

/// Generation is checked before speed; its failure reason wins.
#[test]
fn generation_check_precedes_speed_check() {
    let rules = RuleSet::default();
    let old_and_slow = cpu("Core i5", Some("6th Gen"), Some(1.2));
    let verdict = evaluate_processor(&old_and_slow, &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("generation"), "reason was: {}", verdict.reason);
}

/// Thresholds of zero mean "no constraint": i9 passes even with nothing
/// else known about it.
#[test]
fn unconstrained_families_always_pass() {
    let rules = RuleSet::default();
    assert!(evaluate_processor(&cpu("Core i9", None, None), &rules).passes);
    assert!(evaluate_processor(&cpu("Ryzen 7", None, None), &rules).passes);
    assert!(evaluate_processor(&cpu("Ryzen Threadripper", None, None), &rules).passes);
}

#[test]
fn xeon_structural_check() {
    let rules = RuleSet::default();

    let new_xeon = classify_processor("Intel Xeon E5-2670 v3");
    assert!(evaluate_processor(new_xeon.value(), &rules).passes);

    let metal = classify_processor("Intel Xeon Gold 6230");
    assert!(evaluate_processor(metal.value(), &rules).passes);

    let e_line = classify_processor("Intel Xeon E-2278G");
    assert!(evaluate_processor(e_line.value(), &rules).passes);

    let old_xeon = classify_processor("Intel Xeon E5620");
    let verdict = evaluate_processor(old_xeon.value(), &rules);
    assert!(!verdict.passes);
}

#[test]
fn epyc_passes_unless_other_families_disabled() {
    let mut rules = RuleSet::default();
    let epyc = classify_processor("AMD EPYC 7452");
    assert!(evaluate_processor(epyc.value(), &rules).passes);

    rules.processor.other.enabled = false;
    let verdict = evaluate_processor(epyc.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("does not meet"), "reason was: {}", verdict.reason);
}

/// Families with no rule-set entry fail with the generic reason.
#[test]
fn unlisted_families_fail_generically() {
    let rules = RuleSet::default();
    for text in ["Qualcomm Snapdragon 8 Gen 2", "Apple M2 Pro", "Samsung Exynos 990"] {
        let result = classify_processor(text);
        let verdict = evaluate_processor(result.value(), &rules);
        assert!(!verdict.passes, "{} unexpectedly passed", text);
        assert!(verdict.reason.contains("does not meet"));
    }
}

/// Custom thresholds for the "other" families apply when enabled.
#[test]
fn other_family_thresholds_apply() {
    let mut rules = RuleSet::default();
    rules.processor.other.min_speed_ghz = 2.5;

    let fast = classify_processor("Intel Celeron N4020 2.8GHz");
    assert!(evaluate_processor(fast.value(), &rules).passes);

    let slow = classify_processor("Intel Celeron N4020 1.1GHz");
    assert!(!evaluate_processor(slow.value(), &rules).passes);
}

#[test]
fn memory_verdict_names_observed_and_required() {
    let rules = RuleSet::default();

    let small = classify_memory("4 GB");
    let verdict = evaluate_memory(small.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("4 GB"), "reason was: {}", verdict.reason);
    assert!(verdict.reason.contains("8 GB"), "reason was: {}", verdict.reason);

    let enough = classify_memory("16 GB");
    assert!(evaluate_memory(enough.value(), &rules).passes);
}

#[test]
fn storage_capacity_and_ssd_requirements() {
    let mut rules = RuleSet::default();

    // A raw 160 GB rounds to the 128 GB commercial tier before the check.
    let small = classify_storage("160 GB SSD");
    let verdict = evaluate_storage(small.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("128 GB"), "reason was: {}", verdict.reason);
    assert!(verdict.reason.contains("256 GB"), "reason was: {}", verdict.reason);

    let big_hdd = classify_storage("1 TB HDD");
    assert!(evaluate_storage(big_hdd.value(), &rules).passes);

    rules.storage.prefer_ssd = true;
    let verdict = evaluate_storage(big_hdd.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("SSD required"), "reason was: {}", verdict.reason);

    let big_ssd = classify_storage("1 TB SSD");
    assert!(evaluate_storage(big_ssd.value(), &rules).passes);
}

/// Storage reasons use the display unit: a failing TB-class requirement is
/// reported in TB.
#[test]
fn storage_reason_uses_display_units() {
    let mut rules = RuleSet::default();
    rules.storage.min_capacity_gb = 2000.0;

    let one_tb = classify_storage("1 TB");
    let verdict = evaluate_storage(one_tb.value(), &rules);
    assert!(!verdict.passes);
    assert!(verdict.reason.contains("1.0 TB"), "reason was: {}", verdict.reason);
    assert!(verdict.reason.contains("2.0 TB"), "reason was: {}", verdict.reason);
}

/// The JSON field names are a compatibility contract.
#[test]
fn rule_set_serializes_with_contract_field_names() {
    let rules = RuleSet::default();
    let json = serde_json::to_string_pretty(&rules).expect("serialize");
    for field in ["minGeneration", "minSpeedGHz", "minCapacityGB", "preferSSD", "amdRyzen5"] {
        assert!(json.contains(field), "missing field {} in {}", field, json);
    }

    let back: RuleSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, rules);
}

/// Verdicts are deterministic: same component, same rules, same outcome.
#[test]
fn evaluation_is_deterministic() {
    let rules = RuleSet::default();
    let component = cpu("Core i5", Some("6th Gen"), Some(3.1));
    let a = evaluate_processor(&component, &rules);
    let b = evaluate_processor(&component, &rules);
    assert_eq!(a, b);
}

#[test]
fn family_rule_constructors() {
    assert_eq!(FamilyRule::unconstrained(), FamilyRule::new(0, 0.0));
}
