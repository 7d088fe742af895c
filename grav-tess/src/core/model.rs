//! Whole-model field evaluation: sums over elements and batches over points.

use ndarray::Array1;

use crate::core::integration::{
    tesseroid_field, tesseroid_field_adaptive, AdaptiveSettings, GlqError, GlqRules,
};
use crate::core::parallel::parallel_map;
use crate::core::types::{Diagnostics, FieldComponent, ObservationPoint, Tesseroid};
use grav_common::GlqOrders;

/// Fixed-order field of a whole model at one point: the plain sum of
/// [`tesseroid_field`] over every element.
///
/// A point lying on an element is counted as degenerate in `diag` and the
/// element is still integrated, so one bad element never aborts the model.
pub fn calc_tess_model(
    model: &[Tesseroid],
    point: &ObservationPoint,
    component: FieldComponent,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    let mut total = 0.0;
    for tess in model {
        if tess.contains(point) {
            diag.degenerate_points += 1;
            log::warn!(
                "point ({} {} {}) lies on tesseroid {:?}; cannot guarantee accuracy",
                point.lon,
                point.lat,
                point.radius,
                tess
            );
        }
        total += tesseroid_field(tess, point, component, rules);
    }
    total
}

/// Adaptive field of a whole model at one point: the sum of
/// [`tesseroid_field_adaptive`] over every element. Non-fatal accuracy
/// conditions accumulate in `diag`; processing always continues over the
/// remaining elements.
pub fn calc_tess_model_adaptive(
    model: &[Tesseroid],
    point: &ObservationPoint,
    component: FieldComponent,
    rules: &mut GlqRules,
    settings: &AdaptiveSettings,
    diag: &mut Diagnostics,
) -> f64 {
    model
        .iter()
        .map(|tess| tesseroid_field_adaptive(tess, point, component, rules, settings, diag))
        .sum()
}

/// Adaptive evaluation of one component with an explicit distance-size
/// ratio instead of the component's default.
pub fn field_with_ratio(
    model: &[Tesseroid],
    point: &ObservationPoint,
    component: FieldComponent,
    ratio: f64,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    calc_tess_model_adaptive(
        model,
        point,
        component,
        rules,
        &AdaptiveSettings::with_ratio(ratio),
        diag,
    )
}

/// Adaptive evaluation of one component with the default settings; the
/// shared implementation behind the per-component entry points below.
fn adaptive_default(
    model: &[Tesseroid],
    point: &ObservationPoint,
    component: FieldComponent,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    calc_tess_model_adaptive(
        model,
        point,
        component,
        rules,
        &AdaptiveSettings::default(),
        diag,
    )
}

/// Gravitational potential of a model (SI), adaptive integration.
pub fn pot(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Pot, rules, diag)
}

/// Northward gravitational acceleration (mGal), adaptive integration.
pub fn gx(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gx, rules, diag)
}

/// Eastward gravitational acceleration (mGal), adaptive integration.
pub fn gy(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gy, rules, diag)
}

/// Downward gravitational acceleration (mGal), adaptive integration.
pub fn gz(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gz, rules, diag)
}

/// North-North gravity gradient (Eötvös), adaptive integration.
pub fn gxx(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gxx, rules, diag)
}

/// North-East gravity gradient (Eötvös), adaptive integration.
pub fn gxy(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gxy, rules, diag)
}

/// North-Down gravity gradient (Eötvös), adaptive integration.
pub fn gxz(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gxz, rules, diag)
}

/// East-East gravity gradient (Eötvös), adaptive integration.
pub fn gyy(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gyy, rules, diag)
}

/// East-Down gravity gradient (Eötvös), adaptive integration.
pub fn gyz(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gyz, rules, diag)
}

/// Down-Down gravity gradient (Eötvös), adaptive integration.
pub fn gzz(
    model: &[Tesseroid],
    point: &ObservationPoint,
    rules: &mut GlqRules,
    diag: &mut Diagnostics,
) -> f64 {
    adaptive_default(model, point, FieldComponent::Gzz, rules, diag)
}

/// One component of a model evaluated over a batch of points.
#[derive(Debug, Clone)]
pub struct FieldBatch {
    /// Field value per point, same order as the input points
    pub values: Array1<f64>,
    /// Accuracy conditions merged across the whole batch
    pub diagnostics: Diagnostics,
}

/// Evaluate one component at many points, in parallel when the `native`
/// feature is enabled.
///
/// One rule template is built from `orders` and cloned per point, so every
/// worker owns its own rescale buffers while the model stays shared and
/// immutable. `settings: None` selects plain fixed-order integration;
/// `Some` selects the adaptive controller.
pub fn calc_field_batch(
    model: &[Tesseroid],
    points: &[ObservationPoint],
    component: FieldComponent,
    orders: GlqOrders,
    settings: Option<&AdaptiveSettings>,
) -> Result<FieldBatch, GlqError> {
    let template = GlqRules::new(orders)?;
    let per_point = parallel_map(points, |point| {
        let mut rules = template.clone();
        let mut diag = Diagnostics::default();
        let value = match settings {
            Some(settings) => {
                calc_tess_model_adaptive(model, point, component, &mut rules, settings, &mut diag)
            }
            None => calc_tess_model(model, point, component, &mut rules, &mut diag),
        };
        (value, diag)
    });

    let mut diagnostics = Diagnostics {
        root_finder_warnings: template.root_finder_warnings(),
        ..Diagnostics::default()
    };
    for (_, diag) in &per_point {
        diagnostics.merge(diag);
    }
    Ok(FieldBatch {
        values: per_point.iter().map(|(value, _)| *value).collect(),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::core::constants::MEAN_EARTH_RADIUS;

    fn two_element_model() -> Vec<Tesseroid> {
        let r = MEAN_EARTH_RADIUS;
        vec![
            Tesseroid::new(-1.0, 0.0, -1.0, 1.0, r - 5.0e4, r, 2670.0).unwrap(),
            Tesseroid::new(0.0, 1.0, -1.0, 1.0, r - 5.0e4, r, -300.0).unwrap(),
        ]
    }

    #[test]
    fn test_model_sum_is_sum_of_elements() {
        let model = two_element_model();
        let point = ObservationPoint::new(0.5, 0.2, MEAN_EARTH_RADIUS + 1.0e6);
        let mut rules = GlqRules::with_order(3).unwrap();
        let mut diag = Diagnostics::default();
        let total = calc_tess_model(&model, &point, FieldComponent::Gz, &mut rules, &mut diag);
        let by_hand: f64 = model
            .iter()
            .map(|t| tesseroid_field(t, &point, FieldComponent::Gz, &mut rules))
            .sum();
        assert_relative_eq!(total, by_hand, max_relative = 1e-15);
        assert!(diag.is_clean());
    }

    #[test]
    fn test_wrappers_match_explicit_component() {
        let model = two_element_model();
        let point = ObservationPoint::new(3.0, -2.0, MEAN_EARTH_RADIUS + 2.5e5);
        let mut rules = GlqRules::with_order(2).unwrap();
        let mut diag = Diagnostics::default();
        let via_wrapper = gzz(&model, &point, &mut rules, &mut diag);
        let explicit = calc_tess_model_adaptive(
            &model,
            &point,
            FieldComponent::Gzz,
            &mut rules,
            &AdaptiveSettings::default(),
            &mut diag,
        );
        assert_eq!(via_wrapper, explicit);
    }

    #[test]
    fn test_ratio_override_matches_settings() {
        let model = two_element_model();
        let point = ObservationPoint::new(0.5, 0.0, MEAN_EARTH_RADIUS + 1.0e5);
        let mut rules = GlqRules::with_order(2).unwrap();
        let mut diag = Diagnostics::default();
        let overridden =
            field_with_ratio(&model, &point, FieldComponent::Gz, 3.0, &mut rules, &mut diag);
        let explicit = calc_tess_model_adaptive(
            &model,
            &point,
            FieldComponent::Gz,
            &mut rules,
            &AdaptiveSettings::with_ratio(3.0),
            &mut diag,
        );
        assert_eq!(overridden, explicit);
    }

    #[test]
    fn test_batch_matches_pointwise() {
        let model = two_element_model();
        let points: Vec<ObservationPoint> = (0..12)
            .map(|i| {
                ObservationPoint::new(-2.0 + 0.4 * i as f64, 0.3, MEAN_EARTH_RADIUS + 2.0e5)
            })
            .collect();
        let orders = GlqOrders { lon: 2, lat: 2, r: 2 };
        let settings = AdaptiveSettings::default();
        let batch = calc_field_batch(
            &model,
            &points,
            FieldComponent::Gz,
            orders,
            Some(&settings),
        )
        .unwrap();
        assert_eq!(batch.values.len(), points.len());
        let mut rules = GlqRules::new(orders).unwrap();
        for (point, &value) in points.iter().zip(batch.values.iter()) {
            let mut diag = Diagnostics::default();
            let single = calc_tess_model_adaptive(
                &model,
                point,
                FieldComponent::Gz,
                &mut rules,
                &settings,
                &mut diag,
            );
            assert_eq!(value, single);
        }
    }

    #[test]
    fn test_batch_fixed_order_mode() {
        let model = two_element_model();
        let points = vec![ObservationPoint::new(10.0, 10.0, MEAN_EARTH_RADIUS + 1.0e6)];
        let orders = GlqOrders::default();
        let fixed = calc_field_batch(&model, &points, FieldComponent::Pot, orders, None).unwrap();
        let mut rules = GlqRules::new(orders).unwrap();
        let mut diag = Diagnostics::default();
        let expected =
            calc_tess_model(&model, &points[0], FieldComponent::Pot, &mut rules, &mut diag);
        assert_eq!(fixed.values[0], expected);
        assert!(fixed.diagnostics.is_clean());
    }

    #[test]
    fn test_batch_rejects_invalid_order() {
        let model = two_element_model();
        let points = vec![ObservationPoint::new(0.0, 0.0, 7.0e6)];
        let orders = GlqOrders { lon: 1, lat: 2, r: 2 };
        assert!(calc_field_batch(&model, &points, FieldComponent::Gz, orders, None).is_err());
    }

    #[test]
    fn test_batch_merges_diagnostics() {
        let model = two_element_model();
        // One point inside the first element, one far away
        let points = vec![
            ObservationPoint::new(-0.5, 0.0, MEAN_EARTH_RADIUS - 2.5e4),
            ObservationPoint::new(30.0, 30.0, MEAN_EARTH_RADIUS + 1.0e6),
        ];
        let batch = calc_field_batch(
            &model,
            &points,
            FieldComponent::Gz,
            GlqOrders::default(),
            Some(&AdaptiveSettings::default()),
        )
        .unwrap();
        assert_eq!(batch.diagnostics.degenerate_points, 1);
    }
}
