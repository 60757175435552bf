//! Estimator kinds, extra tags and feature flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported estimator categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstimatorKind {
    #[serde(rename = "classifier")]
    Classifier,
    #[serde(rename = "regressor")]
    Regressor,
    #[serde(rename = "outlier")]
    OutlierDetector,
    #[serde(rename = "transformer")]
    Transformer,
    #[serde(rename = "cluster")]
    Clusterer,
    #[serde(rename = "feature-selector")]
    FeatureSelector,
}

impl EstimatorKind {
    pub const ALL: [EstimatorKind; 6] = [
        EstimatorKind::Classifier,
        EstimatorKind::Regressor,
        EstimatorKind::OutlierDetector,
        EstimatorKind::Transformer,
        EstimatorKind::Clusterer,
        EstimatorKind::FeatureSelector,
    ];

    /// Token used on the command line and in the browser UI
    pub fn token(&self) -> &'static str {
        match self {
            EstimatorKind::Classifier => "classifier",
            EstimatorKind::Regressor => "regressor",
            EstimatorKind::OutlierDetector => "outlier",
            EstimatorKind::Transformer => "transformer",
            EstimatorKind::Clusterer => "cluster",
            EstimatorKind::FeatureSelector => "feature-selector",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EstimatorKind::Classifier => "Classifier",
            EstimatorKind::Regressor => "Regressor",
            EstimatorKind::OutlierDetector => "Outlier",
            EstimatorKind::Transformer => "Transformer",
            EstimatorKind::Clusterer => "Cluster",
            EstimatorKind::FeatureSelector => "Feature Selector",
        }
    }

    /// scikit-learn mixin the generated class derives from
    pub fn mixin(&self) -> &'static str {
        match self {
            EstimatorKind::Classifier => "ClassifierMixin",
            EstimatorKind::Regressor => "RegressorMixin",
            EstimatorKind::OutlierDetector => "OutlierMixin",
            EstimatorKind::Transformer => "TransformerMixin",
            EstimatorKind::Clusterer => "ClusterMixin",
            EstimatorKind::FeatureSelector => "SelectorMixin",
        }
    }

    /// Which optional flags make sense for this kind.
    ///
    /// `linear` is the currently chosen value: a linear classifier already
    /// gets `decision_function` from its base class.
    pub fn availability(&self, linear: bool) -> FlagAvailability {
        let linear_offerable = matches!(self, EstimatorKind::Classifier | EstimatorKind::Regressor);
        FlagAvailability {
            linear: linear_offerable,
            predict_proba: matches!(
                self,
                EstimatorKind::Classifier | EstimatorKind::OutlierDetector
            ),
            decision_function: *self == EstimatorKind::Classifier && !(linear && linear_offerable),
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classifier" => Ok(EstimatorKind::Classifier),
            "regressor" => Ok(EstimatorKind::Regressor),
            "outlier" | "outlier-detector" => Ok(EstimatorKind::OutlierDetector),
            "transformer" => Ok(EstimatorKind::Transformer),
            "cluster" | "clusterer" => Ok(EstimatorKind::Clusterer),
            "feature-selector" | "selector" => Ok(EstimatorKind::FeatureSelector),
            _ => {
                let available: Vec<&str> = EstimatorKind::ALL.iter().map(|k| k.token()).collect();
                Err(format!(
                    "Unknown estimator type '{}'. Available types: {}",
                    s,
                    available.join(", ")
                ))
            }
        }
    }
}

/// Which of the optional flags can be offered to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagAvailability {
    pub linear: bool,
    pub predict_proba: bool,
    pub decision_function: bool,
}

/// Boolean features of the generated estimator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorFlags {
    pub sample_weight: bool,
    pub linear: bool,
    pub predict_proba: bool,
    pub decision_function: bool,
}

impl EstimatorFlags {
    /// Force every flag that does not apply to `kind` to false
    pub fn normalized(self, kind: EstimatorKind) -> Self {
        let linear = self.linear && kind.availability(false).linear;
        let available = kind.availability(linear);
        Self {
            sample_weight: self.sample_weight,
            linear,
            predict_proba: self.predict_proba && available.predict_proba,
            decision_function: self.decision_function && available.decision_function,
        }
    }
}

/// Identifies one of the boolean flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    SampleWeight,
    Linear,
    PredictProba,
    DecisionFunction,
}

impl Flag {
    pub const ALL: [Flag; 4] = [
        Flag::SampleWeight,
        Flag::Linear,
        Flag::PredictProba,
        Flag::DecisionFunction,
    ];

    pub fn get(&self, flags: &EstimatorFlags) -> bool {
        match self {
            Flag::SampleWeight => flags.sample_weight,
            Flag::Linear => flags.linear,
            Flag::PredictProba => flags.predict_proba,
            Flag::DecisionFunction => flags.decision_function,
        }
    }

    pub fn set(&self, flags: &mut EstimatorFlags, value: bool) {
        match self {
            Flag::SampleWeight => flags.sample_weight = value,
            Flag::Linear => flags.linear = value,
            Flag::PredictProba => flags.predict_proba = value,
            Flag::DecisionFunction => flags.decision_function = value,
        }
    }

    /// Whether this flag can be offered given the current availability
    pub fn is_offerable(&self, availability: &FlagAvailability) -> bool {
        match self {
            Flag::SampleWeight => true,
            Flag::Linear => availability.linear,
            Flag::PredictProba => availability.predict_proba,
            Flag::DecisionFunction => availability.decision_function,
        }
    }
}

/// scikit-learn extra estimator tags
///
/// See <https://scikit-learn.org/dev/developers/develop.html#estimator-tags>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
    AllowNan,
    ArrayApiSupport,
    BinaryOnly,
    Multilabel,
    Multioutput,
    MultioutputOnly,
    NoValidation,
    NonDeterministic,
    Pairwise,
    PreservesDtype,
    PoorScore,
    RequiresFit,
    RequiresPositiveX,
    RequiresY,
    RequiresPositiveY,
    SkipTest,
    XfailChecks,
    Stateless,
    XTypes,
}

impl TagName {
    pub const ALL: [TagName; 19] = [
        TagName::AllowNan,
        TagName::ArrayApiSupport,
        TagName::BinaryOnly,
        TagName::Multilabel,
        TagName::Multioutput,
        TagName::MultioutputOnly,
        TagName::NoValidation,
        TagName::NonDeterministic,
        TagName::Pairwise,
        TagName::PreservesDtype,
        TagName::PoorScore,
        TagName::RequiresFit,
        TagName::RequiresPositiveX,
        TagName::RequiresY,
        TagName::RequiresPositiveY,
        TagName::SkipTest,
        TagName::XfailChecks,
        TagName::Stateless,
        TagName::XTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagName::AllowNan => "allow_nan",
            TagName::ArrayApiSupport => "array_api_support",
            TagName::BinaryOnly => "binary_only",
            TagName::Multilabel => "multilabel",
            TagName::Multioutput => "multioutput",
            TagName::MultioutputOnly => "multioutput_only",
            TagName::NoValidation => "no_validation",
            TagName::NonDeterministic => "non_deterministic",
            TagName::Pairwise => "pairwise",
            TagName::PreservesDtype => "preserves_dtype",
            TagName::PoorScore => "poor_score",
            TagName::RequiresFit => "requires_fit",
            TagName::RequiresPositiveX => "requires_positive_X",
            TagName::RequiresY => "requires_y",
            TagName::RequiresPositiveY => "requires_positive_y",
            TagName::SkipTest => "_skip_test",
            TagName::XfailChecks => "_xfail_checks",
            TagName::Stateless => "stateless",
            TagName::XTypes => "X_types",
        }
    }

    /// Exact (case sensitive) lookup
    pub fn lookup(s: &str) -> Option<TagName> {
        TagName::ALL.into_iter().find(|tag| tag.as_str() == s)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tokens_round_trip() {
        for kind in EstimatorKind::ALL {
            assert_eq!(kind.token().parse::<EstimatorKind>(), Ok(kind));
        }
        assert_eq!(
            "Outlier-Detector".parse::<EstimatorKind>(),
            Ok(EstimatorKind::OutlierDetector)
        );
        assert!("forest".parse::<EstimatorKind>().is_err());
    }

    #[test]
    fn test_linear_only_for_classifier_and_regressor() {
        for kind in EstimatorKind::ALL {
            let expected = matches!(kind, EstimatorKind::Classifier | EstimatorKind::Regressor);
            assert_eq!(kind.availability(false).linear, expected, "{}", kind);
        }
    }

    #[test]
    fn test_predict_proba_only_for_classifier_and_outlier() {
        for kind in EstimatorKind::ALL {
            let expected = matches!(
                kind,
                EstimatorKind::Classifier | EstimatorKind::OutlierDetector
            );
            assert_eq!(kind.availability(false).predict_proba, expected, "{}", kind);
        }
    }

    #[test]
    fn test_decision_function_suppressed_by_linear() {
        assert!(EstimatorKind::Classifier.availability(false).decision_function);
        assert!(!EstimatorKind::Classifier.availability(true).decision_function);
        assert!(!EstimatorKind::OutlierDetector.availability(false).decision_function);
    }

    #[test]
    fn test_normalized_resets_stale_flags() {
        let flags = EstimatorFlags {
            sample_weight: true,
            linear: true,
            predict_proba: true,
            decision_function: true,
        };

        let transformer = flags.normalized(EstimatorKind::Transformer);
        assert_eq!(
            transformer,
            EstimatorFlags {
                sample_weight: true,
                ..EstimatorFlags::default()
            }
        );

        let classifier = flags.normalized(EstimatorKind::Classifier);
        assert!(classifier.linear);
        assert!(classifier.predict_proba);
        assert!(!classifier.decision_function);

        let outlier = flags.normalized(EstimatorKind::OutlierDetector);
        assert!(!outlier.linear);
        assert!(outlier.predict_proba);
        assert!(!outlier.decision_function);
    }

    #[test]
    fn test_tag_lookup_is_exact() {
        assert_eq!(TagName::lookup("allow_nan"), Some(TagName::AllowNan));
        assert_eq!(TagName::lookup("requires_positive_X"), Some(TagName::RequiresPositiveX));
        assert_eq!(TagName::lookup("Allow_Nan"), None);
        assert_eq!(TagName::lookup("some_madeup_tag"), None);
    }
}
