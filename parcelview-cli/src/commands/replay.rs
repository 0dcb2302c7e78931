use crate::config::FileConfig;
use crate::context;
use crate::error::{CliError, CliResult};
use crate::output::{self, Summary};
use parcelview_core::RouteLocation;
use parcelview_router::Navigator;
use std::fs;
use std::path::Path;
use tracing::warn;

/// One line of a replay script
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Visit(RouteLocation),
    Back,
    Forward,
}

/// Parse a replay script.
///
/// Blank lines and lines starting with `#` are skipped. `back` and
/// `forward` step through history; anything else must be a route path.
pub fn parse_script(text: &str) -> CliResult<Vec<Step>> {
    let mut steps = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = match line {
            "back" => Step::Back,
            "forward" => Step::Forward,
            path => Step::Visit(RouteLocation::parse(path).map_err(|e| {
                CliError::Input(format!("line {}: {e}", i + 1))
            })?),
        };
        steps.push(step);
    }
    Ok(steps)
}

/// Run every step in order; history steps with nothing to replay are skipped.
pub async fn replay(navigator: &mut Navigator, steps: &[Step]) -> CliResult<Vec<Summary>> {
    let mut summaries = Vec::with_capacity(steps.len());
    for step in steps {
        let outcome = match step {
            Step::Visit(route) => Some(navigator.navigate(route.clone()).await?),
            Step::Back => navigator.back().await?,
            Step::Forward => navigator.forward().await?,
        };
        match outcome {
            Some(outcome) => summaries.push(Summary::capture(navigator, &outcome)),
            None => warn!(step = ?step, "no history entry; skipping"),
        }
    }
    Ok(summaries)
}

pub async fn run(file: &Path, config: &FileConfig, json: bool) -> CliResult<()> {
    let text = fs::read_to_string(file)
        .map_err(|e| CliError::Input(format!("cannot read {}: {e}", file.display())))?;
    let steps = parse_script(&text)?;
    if steps.is_empty() {
        return Err(CliError::Usage(format!("{} has no steps", file.display())));
    }

    let mut navigator = context::build_navigator(config)?;
    let summaries = replay(&mut navigator, &steps).await?;
    println!("{}", output::render_all(&summaries, json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelview_core::RouteName;

    #[test]
    fn test_parse_script() {
        let steps = parse_script(
            "# morning session\n/search?address=1234+Market+St\n\n  back  \nforward\n/not-found\n",
        )
        .unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(&steps[0], Step::Visit(r) if r.name == RouteName::Search));
        assert_eq!(steps[1], Step::Back);
        assert_eq!(steps[2], Step::Forward);
        assert!(matches!(&steps[3], Step::Visit(r) if r.name == RouteName::NotFound));
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = parse_script("/\nsearch?address=x\n").unwrap_err();
        assert!(matches!(err, CliError::Input(msg) if msg.starts_with("line 2:")));
    }
}
