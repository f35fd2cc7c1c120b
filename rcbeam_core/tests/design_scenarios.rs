//! End-to-end checks of the design pipeline and optimizer against hand
//! calculations for a 300 x 500 beam and small search grids.

use rcbeam_core::calculations::{design_beam, design_flexure, design_shear, ShearDesignMode};
use rcbeam_core::code_tables::min_tension_steel_ratio;
use rcbeam_core::cost::CostProfile;
use rcbeam_core::loads::LoadDemand;
use rcbeam_core::materials::{ConcreteGrade, MaterialGrade, SteelGrade};
use rcbeam_core::optimizer::{optimize, rank_candidates, SearchSpace, SectionTemplate};
use rcbeam_core::section::{Section, SupportCondition};

fn section_300x500() -> Section {
    Section::new(300.0, 500.0, 450.0, 25.0, 5000.0, SupportCondition::SimplySupported).unwrap()
}

fn m25_fe500() -> MaterialGrade {
    MaterialGrade::new(ConcreteGrade::M25, SteelGrade::Fe500)
}

/// 4 widths x 4 depths x 2 concretes x 1 steel
fn heavy_shear_grid() -> SearchSpace {
    SearchSpace::grid(
        SectionTemplate::default(),
        &[200.0, 230.0, 250.0, 300.0],
        &[300.0, 350.0, 400.0, 450.0],
        &[ConcreteGrade::M20, ConcreteGrade::M25],
        &[SteelGrade::Fe500],
    )
}

fn heavy_shear_demand() -> LoadDemand {
    LoadDemand::new(150.0, 320.0).unwrap()
}

/// Long cantilevers: every section fails L/d
fn slender_cantilever_grid() -> SearchSpace {
    let template = SectionTemplate {
        span_mm: 6000.0,
        support: SupportCondition::Cantilever,
        ..SectionTemplate::default()
    };
    SearchSpace::grid(
        template,
        &[230.0, 300.0],
        &[300.0, 350.0, 400.0],
        &[ConcreteGrade::M25],
        &[SteelGrade::Fe500],
    )
}

#[test]
fn singly_reinforced_steel_matches_hand_calculation() {
    let result = design_flexure(&section_300x500(), ConcreteGrade::M25, SteelGrade::Fe500, 120.0).unwrap();

    assert!(!result.outcome.is_doubly());
    assert!(result.mu_knm < result.mu_lim_knm);
    // Ast = 0.5 fck/fy [1 - sqrt(1 - 4.6 Mu / (fck b d²))] b d
    let reference = 682.30;
    assert!((result.ast_required_mm2 - reference).abs() / reference < 0.01);
    assert!((result.mu_lim_knm - 202.91).abs() < 0.01);
}

#[test]
fn full_design_of_reference_beam() {
    let candidate = design_beam(
        &section_300x500(),
        m25_fe500(),
        &LoadDemand::new(120.0, 150.0).unwrap(),
        &CostProfile::default(),
    )
    .unwrap();

    assert!(candidate.is_adequate());
    assert!(candidate.failed_checks().is_empty());
    assert_eq!(candidate.reinforcement.tension_bars.count, 7);
    assert_eq!(candidate.reinforcement.tension_bars.diameter_mm, 12.0);
    assert!((candidate.cost.total - 12612.95).abs() < 0.01);
}

#[test]
fn doubly_reinforced_beyond_limiting_moment() {
    let candidate = design_beam(
        &section_300x500(),
        m25_fe500(),
        &LoadDemand::new(250.0, 150.0).unwrap(),
        &CostProfile::default(),
    )
    .unwrap();

    let flexure = &candidate.reinforcement.flexure;
    assert!(flexure.outcome.is_doubly());
    assert!((flexure.asc_required_mm2 - 296.3).abs() < 0.5);
    assert!((flexure.ast_required_mm2 - 1555.4).abs() < 0.5);
    assert!(candidate.reinforcement.asc_provided_mm2() >= flexure.asc_required_mm2);
    assert!(candidate.is_adequate());
}

#[test]
fn shear_switches_to_calculated_spacing() {
    let section = section_300x500();
    let flexure = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, 120.0).unwrap();
    let pt = 100.0 * flexure.ast_design_mm2() / section.effective_area_mm2();

    let light = design_shear(&section, ConcreteGrade::M25, SteelGrade::Fe500, 60.0, pt).unwrap();
    assert_eq!(light.mode, ShearDesignMode::Minimum);
    assert!(light.tau_v_mpa <= light.tau_c_mpa);

    let spacings: Vec<f64> = [150.0, 200.0, 250.0]
        .iter()
        .map(|&vu| {
            let result = design_shear(&section, ConcreteGrade::M25, SteelGrade::Fe500, vu, pt).unwrap();
            assert_eq!(result.mode, ShearDesignMode::Calculated);
            result.spacing_mm
        })
        .collect();

    assert_eq!(spacings, vec![235.0, 145.0, 105.0]);
    assert!(spacings.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn required_steel_is_monotonic_in_moment() {
    let section = section_300x500();
    let mut previous = 0.0;
    for step in 0..=30 {
        let mu = step as f64 * 10.0;
        let result = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, mu).unwrap();
        assert!(
            result.ast_required_mm2 >= previous,
            "Ast dropped at Mu = {}: {} < {}",
            mu,
            result.ast_required_mm2,
            previous
        );
        previous = result.ast_required_mm2;
    }
}

#[test]
fn design_is_bit_identical_on_repeat() {
    let demand = LoadDemand::new(250.0, 200.0).unwrap();
    let a = design_beam(&section_300x500(), m25_fe500(), &demand, &CostProfile::default()).unwrap();
    let b = design_beam(&section_300x500(), m25_fe500(), &demand, &CostProfile::default()).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn only_widest_sections_are_feasible() {
    let result = optimize(&heavy_shear_grid(), &heavy_shear_demand(), &CostProfile::default(), 5).unwrap();

    assert_eq!(result.evaluated, 32);
    assert_eq!(result.feasible, 3);
    assert_eq!(result.ranked.len(), 3);
    assert!(result.diagnostic.is_none());
    assert!(result.ranked.iter().all(|c| c.section.width_mm == 300.0));

    let best = &result.ranked[0];
    assert_eq!(best.section.overall_depth_mm, 400.0);
    assert_eq!(best.material.concrete, ConcreteGrade::M25);
    assert!((best.cost.total - 14966.44).abs() < 0.01);

    // Singly reinforced, but 6-16φ overshoots Ast,lim and is balanced by top steel
    let second = &result.ranked[1];
    assert_eq!(second.section.overall_depth_mm, 450.0);
    assert_eq!(second.material.concrete, ConcreteGrade::M25);
    assert!(!second.reinforcement.flexure.outcome.is_doubly());
    assert!(second.reinforcement.carries_compression_steel());
    assert!((second.cost.total - 15118.69).abs() < 0.01);

    let third = &result.ranked[2];
    assert_eq!(third.section.overall_depth_mm, 450.0);
    assert_eq!(third.material.concrete, ConcreteGrade::M20);
    assert!(second.cost.total < third.cost.total);
}

#[test]
fn ductile_just_below_limiting_moment() {
    let section = section_300x500();
    let mu_lim = design_flexure(&section, ConcreteGrade::M25, SteelGrade::Fe500, 0.0).unwrap().mu_lim_knm;
    for step in 0..=20 {
        let mu = mu_lim * (0.95 + 0.0025 * step as f64);
        let candidate = design_beam(
            &section,
            m25_fe500(),
            &LoadDemand::new(mu, 100.0).unwrap(),
            &CostProfile::default(),
        )
        .unwrap();
        assert!(
            candidate.is_adequate(),
            "Mu = {:.2} kN·m failed {:?}",
            mu,
            candidate.failed_checks()
        );
    }
}

#[test]
fn optimizer_is_deterministic() {
    let first = optimize(&heavy_shear_grid(), &heavy_shear_demand(), &CostProfile::default(), 5).unwrap();
    let second = optimize(&heavy_shear_grid(), &heavy_shear_demand(), &CostProfile::default(), 5).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn single_feasible_candidate_is_returned_alone() {
    let space = SearchSpace::grid(
        SectionTemplate::default(),
        &[300.0],
        &[400.0],
        &[ConcreteGrade::M20, ConcreteGrade::M25],
        &[SteelGrade::Fe500],
    );
    let result = optimize(&space, &heavy_shear_demand(), &CostProfile::default(), 10).unwrap();

    assert_eq!(result.ranked.len(), 1);
    assert_eq!(result.ranked[0].material.concrete, ConcreteGrade::M25);
}

#[test]
fn deflection_blocks_every_candidate() {
    let result = optimize(
        &slender_cantilever_grid(),
        &LoadDemand::new(10.0, 10.0).unwrap(),
        &CostProfile::default(),
        5,
    )
    .unwrap();

    assert!(result.ranked.is_empty());
    assert!(!result.is_feasible());
    let diagnostic = result.diagnostic.expect("infeasible search carries a diagnostic");

    assert_eq!(diagnostic.blocking_checks, vec!["deflection".to_string()]);
    assert_eq!(diagnostic.failure_counts["deflection"], result.evaluated);
    assert_eq!(diagnostic.failure_counts["bar_spacing"], 3);
    assert_eq!(diagnostic.failure_counts["shear"], 0);

    assert_eq!(diagnostic.near_misses.len(), 5);
    let closest = &diagnostic.near_misses[0];
    assert_eq!(closest.failed_checks, vec!["deflection".to_string()]);
    assert_eq!(closest.candidate.section.width_mm, 230.0);
    assert_eq!(closest.candidate.section.overall_depth_mm, 300.0);
    for miss in &diagnostic.near_misses {
        assert!(miss.failed_checks.contains(&"deflection".to_string()));
    }
}

#[test]
fn equal_cost_prefers_lighter_section() {
    let demand = LoadDemand::new(80.0, 60.0).unwrap();
    let template = SectionTemplate::default();
    let heavy = design_beam(&template.section(300.0, 400.0).unwrap(), m25_fe500(), &demand, &CostProfile::default())
        .unwrap();
    let mut light = design_beam(&template.section(230.0, 450.0).unwrap(), m25_fe500(), &demand, &CostProfile::default())
        .unwrap();
    light.cost.total = heavy.cost.total;

    for input in [vec![heavy.clone(), light.clone()], vec![light.clone(), heavy.clone()]] {
        let ranked = rank_candidates(input);
        assert_eq!(ranked[0].section.width_mm, 230.0);
        assert_eq!(ranked[1].section.width_mm, 300.0);
    }
}

#[test]
fn adequate_designs_carry_minimum_steel() {
    let space = SearchSpace::grid(
        SectionTemplate::default(),
        &[230.0, 300.0],
        &[400.0, 500.0, 600.0],
        &[ConcreteGrade::M20, ConcreteGrade::M30],
        &[SteelGrade::Fe415, SteelGrade::Fe500],
    );
    let result = optimize(&space, &LoadDemand::new(5.0, 20.0).unwrap(), &CostProfile::default(), 24).unwrap();

    assert!(!result.ranked.is_empty());
    for candidate in &result.ranked {
        let section = &candidate.section;
        let ast_min = min_tension_steel_ratio(candidate.material.steel) * section.effective_area_mm2();
        assert!(candidate.reinforcement.ast_provided_mm2() >= ast_min);
    }
}

#[test]
fn cost_total_is_sum_of_items() {
    let profile = CostProfile {
        labor_multiplier: 1.25,
        ..CostProfile::default()
    };
    let result = optimize(&heavy_shear_grid(), &LoadDemand::new(60.0, 80.0).unwrap(), &profile, 32).unwrap();

    for candidate in &result.ranked {
        let c = &candidate.cost;
        let sum = c.concrete_cost + c.steel_cost + c.formwork_cost + c.labor_adjustment;
        assert!((c.total - sum).abs() <= 1e-6 * c.total);
        assert!((c.labor_adjustment - 0.25 * c.material_subtotal()).abs() <= 1e-6 * c.total);
    }
}

#[test]
fn bad_template_aborts_search() {
    let template = SectionTemplate {
        clear_cover_mm: 400.0,
        ..SectionTemplate::default()
    };
    let space = SearchSpace::grid(template, &[300.0], &[300.0, 450.0], &[ConcreteGrade::M25], &[SteelGrade::Fe500]);
    let err = optimize(&space, &LoadDemand::new(50.0, 50.0).unwrap(), &CostProfile::default(), 3).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_SECTION");
}
