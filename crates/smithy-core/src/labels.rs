//! User-facing prompt labels shared by every front end

use crate::estimator::Flag;

pub const PROMPT_NAME: &str = "🐍 How would you like to name the estimator?";
pub const PROMPT_ESTIMATOR: &str = "🎯 Which kind of estimator is it?";
pub const PROMPT_REQUIRED: &str = "📜 Please list the required parameters (comma-separated)";
pub const PROMPT_OPTIONAL: &str = "📑 Please list the optional parameters (comma-separated)";
pub const PROMPT_SAMPLE_WEIGHT: &str = "📶 Does the `.fit()` method support `sample_weight`?";
pub const PROMPT_LINEAR: &str = "📏 Is the estimator linear?";
pub const PROMPT_PREDICT_PROBA: &str = "🎲 Should the estimator implement a `predict_proba` method?";
pub const PROMPT_DECISION_FUNCTION: &str =
    "❓ Should the estimator implement a `decision_function` method?";
pub const PROMPT_TAGS: &str =
    "🧪 We are almost there... Is there any tag you want to add? (comma-separated)";
pub const PROMPT_OUTPUT: &str = "📂 Where would you like to save the class?";

/// Prompt label for a boolean flag
pub fn flag_prompt(flag: Flag) -> &'static str {
    match flag {
        Flag::SampleWeight => PROMPT_SAMPLE_WEIGHT,
        Flag::Linear => PROMPT_LINEAR,
        Flag::PredictProba => PROMPT_PREDICT_PROBA,
        Flag::DecisionFunction => PROMPT_DECISION_FUNCTION,
    }
}
