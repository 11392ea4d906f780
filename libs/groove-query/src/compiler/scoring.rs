use serde_json::{json, Value as JsonValue};

use crate::clock::Clock;
use crate::config::CompilerConfig;
use crate::fields;

/// Wrap `query` in a recency boost: a constant weight plus a decay over the
/// latest release date, summed, then multiplied into the text score.
pub fn with_recency_boost(query: JsonValue, config: &CompilerConfig, clock: &Clock) -> JsonValue {
    let decay = config.decay_function.as_str();
    let recency = fields::LATEST_RELEASE_DATE;
    json!({
        "function_score": {
            "query": query,
            "functions": [
                { "weight": config.boost_factor },
                {
                    decay: {
                        recency: {
                            "origin": clock.now(),
                            "scale": config.decay_scale,
                        }
                    }
                }
            ],
            "score_mode": "sum",
            "boost_mode": "multiply",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl;

    #[test]
    fn boost_shape() {
        let q = with_recency_boost(dsl::match_all(), &CompilerConfig::default(), &Clock::Relative);
        let fs = &q["function_score"];
        assert_eq!(fs["query"], dsl::match_all());
        assert_eq!(fs["functions"][0]["weight"], 1.0);
        assert_eq!(
            fs["functions"][1]["gauss"]["latest_release_date"],
            json!({ "origin": "now", "scale": "365d" })
        );
        assert_eq!(fs["score_mode"], "sum");
        assert_eq!(fs["boost_mode"], "multiply");
    }

    #[test]
    fn configured_decay_function_and_scale() {
        let config: CompilerConfig =
            serde_json::from_value(json!({ "decay_function": "exp", "decay_scale": "30d" }))
                .unwrap();
        let q = with_recency_boost(dsl::match_all(), &config, &Clock::Relative);
        let decay = &q["function_score"]["functions"][1];
        assert!(decay.get("gauss").is_none());
        assert_eq!(
            decay["exp"]["latest_release_date"],
            json!({ "origin": "now", "scale": "30d" })
        );
    }
}
