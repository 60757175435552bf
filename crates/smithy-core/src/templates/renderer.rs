//! Estimator template rendering
//!
//! The template is embedded into the binary at compile-time and rendered with
//! Handlebars. Every conditional section is driven by a boolean computed in
//! [`TemplateValues::from_request`].

use crate::error::ForgeError;
use crate::estimator::EstimatorKind;
use crate::request::ForgeRequest;
use handlebars::Handlebars;
use serde::Serialize;

/// Logical path of the bundled estimator template
pub const TEMPLATE_PATH: &str = "templates/estimator.py.hbs";

const TEMPLATE_SOURCE: &str = include_str!("../../templates/estimator.py.hbs");

/// Values substituted into the template
#[derive(Debug, Serialize)]
struct TemplateValues<'a> {
    name: &'a str,
    estimator_type: &'static str,
    mixin: &'static str,
    required: &'a [String],
    optional: &'a [String],
    parameters: Vec<&'a str>,
    has_required: bool,
    has_optional: bool,
    has_parameters: bool,
    has_max_iter: bool,
    has_predict: bool,
    sample_weight: bool,
    linear: bool,
    predict_proba: bool,
    decision_function: bool,
    tags: Vec<&'static str>,
    has_tags: bool,
    classifier: bool,
    regressor: bool,
    outlier: bool,
    transformer: bool,
    cluster: bool,
    feature_selector: bool,
}

impl<'a> TemplateValues<'a> {
    fn from_request(request: &'a ForgeRequest) -> Self {
        let kind = request.kind();
        let flags = request.flags();
        let parameters: Vec<&str> = request.parameters().collect();
        let tags: Vec<&'static str> = request.tags().iter().map(|t| t.as_str()).collect();

        // Linear models inherit `predict` from their base class
        let has_predict = match kind {
            EstimatorKind::Classifier | EstimatorKind::Regressor => !flags.linear,
            EstimatorKind::OutlierDetector | EstimatorKind::Clusterer => true,
            EstimatorKind::Transformer | EstimatorKind::FeatureSelector => false,
        };

        Self {
            name: request.name(),
            estimator_type: kind.token(),
            mixin: kind.mixin(),
            required: request.required(),
            optional: request.optional(),
            has_required: !request.required().is_empty(),
            has_optional: !request.optional().is_empty(),
            has_parameters: !parameters.is_empty(),
            has_max_iter: parameters.contains(&"max_iter"),
            parameters,
            has_predict,
            sample_weight: flags.sample_weight,
            linear: flags.linear,
            predict_proba: flags.predict_proba,
            decision_function: flags.decision_function,
            has_tags: !tags.is_empty(),
            tags,
            classifier: kind == EstimatorKind::Classifier,
            regressor: kind == EstimatorKind::Regressor,
            outlier: kind == EstimatorKind::OutlierDetector,
            transformer: kind == EstimatorKind::Transformer,
            cluster: kind == EstimatorKind::Clusterer,
            feature_selector: kind == EstimatorKind::FeatureSelector,
        }
    }
}

/// Renders a [`ForgeRequest`] into unformatted python source
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, ForgeError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_PATH, TEMPLATE_SOURCE)
            .map_err(|e| ForgeError::TemplateCompile {
                path: TEMPLATE_PATH,
                source: Box::new(e),
            })?;
        Ok(Self { registry })
    }

    /// Render the template. Output is deterministic for a given request.
    pub fn render(&self, request: &ForgeRequest) -> Result<String, ForgeError> {
        let values = TemplateValues::from_request(request);
        tracing::debug!(
            name = values.name,
            kind = values.estimator_type,
            "rendering estimator template"
        );
        Ok(self.registry.render(TEMPLATE_PATH, &values)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::{EstimatorFlags, TagName};
    use crate::parsers::parse_name;

    fn request(kind: EstimatorKind) -> ForgeRequest {
        ForgeRequest::new(parse_name("MightyEstimator").unwrap(), kind)
    }

    fn render(request: &ForgeRequest) -> String {
        Renderer::new().unwrap().render(request).unwrap()
    }

    fn flags(linear: bool, predict_proba: bool, decision_function: bool) -> EstimatorFlags {
        EstimatorFlags {
            sample_weight: false,
            linear,
            predict_proba,
            decision_function,
        }
    }

    #[test]
    fn test_params() {
        let req = request(EstimatorKind::Classifier)
            .with_params(
                vec!["alpha".into(), "max_iter".into()],
                vec!["mu".into(), "sigma".into()],
            )
            .unwrap();
        let result = render(&req);

        for p in ["alpha", "max_iter", "mu", "sigma"] {
            assert!(result.contains(&format!("self.{p} = {p}")), "{p}");
        }
        assert!(result.contains(r#"_required_parameters = ["alpha", "max_iter"]"#));
        assert!(result.contains("self.n_iter_"));
        assert!(result.contains("def __init__(self, alpha, max_iter, *, mu=..., sigma=..., ):"));
    }

    #[test]
    fn test_no_params() {
        let result = render(&request(EstimatorKind::Classifier));
        assert!(!result.contains("_required_parameters = "));
        assert!(!result.contains("def __init__"));
        assert!(!result.contains("self.n_iter_"));
    }

    #[test]
    fn test_tags() {
        let req = request(EstimatorKind::Classifier)
            .with_tags(vec![TagName::AllowNan, TagName::BinaryOnly]);
        let result = render(&req);
        assert!(result.contains("def _more_tags(self)"));
        assert!(result.contains(r#""allow_nan": ...,"#));
        assert!(result.contains(r#""binary_only": ...,"#));

        let result = render(&request(EstimatorKind::Classifier));
        assert!(!result.contains("def _more_tags(self)"));
    }

    #[test]
    fn test_common_estimator() {
        for kind in EstimatorKind::ALL {
            for sample_weight in [true, false] {
                let req = request(kind).with_flags(EstimatorFlags {
                    sample_weight,
                    ..EstimatorFlags::default()
                });
                let result = render(&req);

                assert!(result.contains("class MightyEstimator"));
                assert!(result.contains("self.n_features_in_ = X.shape[1]"));
                assert_eq!(
                    result.contains("sample_weight = _check_sample_weight(sample_weight)"),
                    sample_weight
                );

                if kind == EstimatorKind::Transformer {
                    assert!(result.contains("X = check_array(X, ...)"));
                    assert_eq!(
                        result.contains("def fit(self, X, y=None, sample_weight=None)"),
                        sample_weight
                    );
                    assert_eq!(result.contains("def fit(self, X, y=None)"), !sample_weight);
                } else {
                    assert!(result.contains("X, y = check_X_y(X, y, ...)"));
                    assert_eq!(
                        result.contains("def fit(self, X, y, sample_weight=None)"),
                        sample_weight
                    );
                    assert_eq!(result.contains("def fit(self, X, y)"), !sample_weight);
                }
            }
        }
    }

    #[test]
    fn test_classifier() {
        for linear in [true, false] {
            for predict_proba in [true, false] {
                for decision_function in [true, false] {
                    let req = request(EstimatorKind::Classifier)
                        .with_flags(flags(linear, predict_proba, decision_function));
                    let result = render(&req);

                    assert!(result.contains("self.classes_ = "));
                    assert!(result.contains("def n_classes_(self)"));
                    assert!(!result.contains("def transform(self, X)"));

                    assert_eq!(
                        result.contains(
                            "class MightyEstimator(LinearClassifierMixin, BaseEstimator)"
                        ),
                        linear
                    );
                    assert_eq!(result.contains("self.coef_ = ..."), linear);
                    assert_eq!(result.contains("self.intercept_ = ..."), linear);
                    assert_eq!(
                        result.contains("class MightyEstimator(ClassifierMixin, BaseEstimator)"),
                        !linear
                    );
                    assert_eq!(result.contains("def predict(self, X)"), !linear);
                    assert_eq!(result.contains("def predict_proba(self, X)"), predict_proba);
                    assert_eq!(
                        result.contains("def decision_function(self, X)"),
                        decision_function && !linear
                    );
                }
            }
        }
    }

    #[test]
    fn test_regressor() {
        for linear in [true, false] {
            let req = request(EstimatorKind::Regressor).with_flags(flags(linear, true, true));
            let result = render(&req);

            assert!(!result.contains("def transform(self, X)"));
            assert_eq!(
                result.contains("class MightyEstimator(RegressorMixin, LinearModel)"),
                linear
            );
            assert_eq!(result.contains("self.coef_ = ..."), linear);
            assert_eq!(
                result.contains("class MightyEstimator(RegressorMixin, BaseEstimator)"),
                !linear
            );
            assert_eq!(result.contains("def predict(self, X)"), !linear);
            assert!(!result.contains("def predict_proba(self, X)"));
            assert!(!result.contains("def decision_function(self, X)"));
        }
    }

    #[test]
    fn test_outlier() {
        for predict_proba in [true, false] {
            let req = request(EstimatorKind::OutlierDetector)
                .with_flags(flags(true, predict_proba, false));
            let result = render(&req);

            assert!(result.contains("class MightyEstimator(OutlierMixin, BaseEstimator)"));
            assert!(result.contains("self.offset_"));
            assert!(result.contains("def score_samples(self, X)"));
            assert!(result.contains("def decision_function(self, X)"));
            assert!(result.contains("def predict(self, X)"));
            assert!(!result.contains("def transform(self, X)"));
            assert!(!result.contains("self.coef_"));
            assert_eq!(result.contains("def predict_proba(self, X)"), predict_proba);
        }
    }

    #[test]
    fn test_transformer() {
        let result = render(&request(EstimatorKind::Transformer));
        assert!(result.contains("class MightyEstimator(TransformerMixin, BaseEstimator)"));
        assert!(result.contains("def transform(self, X)"));
        assert!(!result.contains("def predict(self, X)"));
    }

    #[test]
    fn test_cluster() {
        let result = render(&request(EstimatorKind::Clusterer));
        assert!(result.contains("class MightyEstimator(ClusterMixin, BaseEstimator)"));
        assert!(result.contains("self.labels_ = ..."));
        assert!(result.contains("def predict(self, X)"));
    }

    #[test]
    fn test_feature_selector() {
        let result = render(&request(EstimatorKind::FeatureSelector));
        assert!(result.contains("from sklearn.feature_selection import SelectorMixin"));
        assert!(result.contains("class MightyEstimator(SelectorMixin, BaseEstimator)"));
        assert!(result.contains("self.support_"));
        assert!(result.contains("def _get_support_mask(self)"));
        assert!(!result.contains("def predict(self, X)"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let req = request(EstimatorKind::Classifier)
            .with_params(vec!["alpha".into()], vec!["beta".into()])
            .unwrap()
            .with_tags(vec![TagName::Stateless]);
        let renderer = Renderer::new().unwrap();
        assert_eq!(renderer.render(&req).unwrap(), renderer.render(&req).unwrap());
    }
}
