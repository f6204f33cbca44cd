//! YAML recipe files.
//!
//! A recipe is a list of steps run in order after any command-line
//! operations:
//!
//! ```yaml
//! - filter: blur
//!   strength: 2
//! - adjust: contrast
//!   value: 1.4
//! - filter: sharpen
//! ```

use anyhow::{bail, Context, Result};
use pixedit_ops::Operation;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One step as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeStep {
    /// Filter name.
    #[serde(default)]
    pub filter: Option<String>,
    /// Filter repeat count; defaults to 1.
    #[serde(default)]
    pub strength: Option<i64>,
    /// Adjustment kind.
    #[serde(default)]
    pub adjust: Option<String>,
    /// Adjustment value.
    #[serde(default)]
    pub value: Option<f64>,
}

impl RecipeStep {
    /// Validates the step and resolves names.
    pub fn to_operation(&self) -> Result<Operation> {
        match (&self.filter, &self.adjust) {
            (Some(name), None) => {
                if self.value.is_some() {
                    bail!("filter step '{name}' takes 'strength', not 'value'");
                }
                Ok(Operation::filter(name, self.strength.unwrap_or(1))?)
            }
            (None, Some(kind)) => {
                if self.strength.is_some() {
                    bail!("adjust step '{kind}' takes 'value', not 'strength'");
                }
                let value = self
                    .value
                    .with_context(|| format!("adjust step '{kind}' is missing 'value'"))?;
                Ok(Operation::adjust(kind, value)?)
            }
            (Some(_), Some(_)) => bail!("step has both 'filter' and 'adjust'"),
            (None, None) => bail!("step has neither 'filter' nor 'adjust'"),
        }
    }
}

/// Parses recipe text into operations.
pub fn parse(text: &str) -> Result<Vec<Operation>> {
    let steps: Vec<RecipeStep> =
        serde_yaml::from_str(text).context("Invalid recipe YAML")?;
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            step.to_operation()
                .with_context(|| format!("Recipe step {}", i + 1))
        })
        .collect()
}

/// Reads and parses a recipe file.
pub fn load(path: &Path) -> Result<Vec<Operation>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipe: {}", path.display()))?;
    let ops = parse(&text).with_context(|| format!("In recipe: {}", path.display()))?;
    debug!(path = %path.display(), steps = ops.len(), "recipe loaded");
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixedit_ops::{Adjustment, Filter};

    #[test]
    fn test_parse_mixed_steps() {
        let ops = parse(
            "- filter: blur\n  strength: 2\n- adjust: contrast\n  value: 1.4\n- filter: sharpen\n",
        )
        .unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Filter { filter: Filter::Blur, strength: 2 },
                Operation::Adjust { adjustment: Adjustment::Contrast, value: 1.4 },
                Operation::Filter { filter: Filter::Sharpen, strength: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_recipe() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_bad_steps() {
        assert!(parse("- filter: emboss").is_err());
        assert!(parse("- adjust: brightness").is_err());
        assert!(parse("- filter: blur\n  adjust: contrast\n  value: 1").is_err());
        assert!(parse("- strength: 3").is_err());
        assert!(parse("- filter: blur\n  value: 3").is_err());
        assert!(parse("- filter: blur\n  radius: 3").is_err());
        assert!(parse("- filter: blur\n  strength: 0").is_err());
        assert!(parse("- adjust: saturation\n  value: -1").is_err());
    }

    #[test]
    fn test_error_names_step() {
        let err = parse("- filter: blur\n- filter: emboss\n").unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Recipe step 2"), "{chain}");
        assert!(chain.contains("emboss"), "{chain}");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.yaml");
        std::fs::write(&path, "- adjust: brightness\n  value: -20\n").unwrap();
        assert_eq!(
            load(&path).unwrap(),
            vec![Operation::Adjust { adjustment: Adjustment::Brightness, value: -20.0 }]
        );
        assert!(load(&dir.path().join("missing.yaml")).is_err());
    }
}
