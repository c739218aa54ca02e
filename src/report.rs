use std::io::{self, Write};

use crossterm::style::{style, StyledContent, Stylize};

use crate::puzzle::State;
use crate::search::{Outcome, SearchReport};

const RULE_WIDTH: usize = 112;

/// Styles `text` when `color` is set, otherwise returns it untouched.
fn paint<F>(text: String, color: bool, f: F) -> String
where
    F: FnOnce(StyledContent<String>) -> StyledContent<String>,
{
    if color {
        f(style(text)).to_string()
    } else {
        text
    }
}

pub fn print_table<W: Write>(out: &mut W, reports: &[SearchReport], color: bool) -> io::Result<()> {
    let header = format!(
        "{:<15} {:<30} {:<15} {:<15} {:<11} {:<8} {:<10}",
        "Method", "Sorted Table", "Open Set Size", "Closed Set Size", "Expansions", "Flips", "Time"
    );
    writeln!(out)?;
    writeln!(out, "{}", paint("Results:".to_string(), color, |s| s.bold()))?;
    writeln!(out, "{}", paint(header, color, |s| s.bold()))?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    for report in reports {
        let result = match report.outcome {
            Outcome::Solved(_) => {
                let goal = report.goal().map(State::to_string).unwrap_or_default();
                paint(format!("{:<30}", goal), color, |s| s.green())
            }
            Outcome::Exhausted => paint(format!("{:<30}", "no solution"), color, |s| s.red()),
            Outcome::Aborted(limit) => {
                let reason = format!("aborted ({:?})", limit);
                paint(format!("{:<30}", reason), color, |s| s.yellow())
            }
        };
        let flips = match report.outcome {
            Outcome::Solved(_) => report.moves().len().to_string(),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "{:<15} {} {:<15} {:<15} {:<11} {:<8} {:<10}",
            report.strategy.to_string(),
            result,
            report.frontier_len(),
            report.explored_len(),
            report.expansions,
            flips,
            format!("{:.2?}", report.elapsed),
        )?;
    }
    Ok(())
}

/// Replays a solved run's flips from `initial`, one line per move.
pub fn print_path<W: Write>(
    out: &mut W,
    initial: &State,
    report: &SearchReport,
    color: bool,
) -> io::Result<()> {
    let moves = report.moves();
    let title = format!("{} ({} flips):", report.strategy, moves.len());
    writeln!(out)?;
    writeln!(out, "{}", paint(title, color, |s| s.bold()))?;

    let mut stack = initial.sequence().to_vec();
    writeln!(out, "  start    {:?}", stack)?;
    for flip in moves {
        flip.apply(&mut stack);
        writeln!(out, "  {:<8} {:?}", flip.to_string(), stack)?;
    }
    Ok(())
}

/// Dumps the final CLOSED and OPEN lists of a run with each node's costs.
pub fn print_sets<W: Write>(out: &mut W, report: &SearchReport, color: bool) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        paint(format!("{}:", report.strategy), color, |s| s.bold())
    )?;
    for (title, states) in [
        ("closed", report.explored().collect::<Vec<_>>()),
        ("open", report.frontier().collect()),
    ] {
        writeln!(out, "  {} ({}):", title, states.len())?;
        for state in states {
            writeln!(
                out,
                "    {:<30} g={:<4} h={:<4} f={}",
                state.to_string(),
                state.depth_cost(),
                state.heuristic_cost(),
                state.total_cost()
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Budget;
    use crate::search::{search, Strategy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_lists_every_run() {
        let initial = State::new(vec![3, 1, 2]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let reports: Vec<SearchReport> = Strategy::ALL
            .iter()
            .map(|&s| search(&initial, s, &Budget::default(), &mut rng))
            .collect();

        let text = render(|out| print_table(out, &reports, false));
        for strategy in Strategy::ALL {
            assert!(text.contains(&strategy.to_string()), "{}", strategy);
        }
        assert!(text.contains("[1, 2, 3]"));
        assert!(text.contains("Closed Set Size"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn table_shows_expansion_counts() {
        let initial = State::new(vec![3, 1, 2]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = search(&initial, Strategy::BreadthFirst, &Budget::default(), &mut rng);

        let text = render(|out| print_table(out, &[report], false));
        assert!(text.contains("Expansions"));
        let row = text
            .lines()
            .find(|l| l.starts_with("Breadth First"))
            .unwrap();
        // open, closed, expansions, flips
        let counts: Vec<&str> = row.split_whitespace().skip(5).take(4).collect();
        assert_eq!(counts, vec!["1", "5", "4", "2"]);
    }

    #[test]
    fn color_is_opt_in() {
        let initial = State::new(vec![2, 1]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = search(&initial, Strategy::DepthFirst, &Budget::default(), &mut rng);

        let plain = render(|out| print_path(out, &initial, &report, false));
        let styled = render(|out| print_path(out, &initial, &report, true));
        assert!(!plain.contains('\x1b'));
        assert!(styled.contains('\x1b'));
        assert!(styled.contains("Depth First (1 flips):"));
    }

    #[test]
    fn aborted_runs_are_marked() {
        let initial = State::new(vec![5, 4, 3, 2, 1, 6]).unwrap();
        let budget = Budget {
            max_expansions: Some(1),
            ..Budget::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = search(&initial, Strategy::BreadthFirst, &budget, &mut rng);

        let text = render(|out| print_table(out, &[report], false));
        assert!(text.contains("aborted (Expansions(1))"));
    }

    #[test]
    fn sets_show_costs() {
        let initial = State::new(vec![3, 1, 2]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = search(&initial, Strategy::DepthFirst, &Budget::default(), &mut rng);

        let text = render(|out| print_sets(out, &report, false));
        assert!(text.contains("  closed (3):"));
        assert!(text.contains("  open (1):"));
        assert!(text.contains("[2, 1, 3]"));
        assert!(text.contains("f=0"));
    }

    #[test]
    fn path_replays_each_flip() {
        let initial = State::new(vec![3, 1, 2]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = search(&initial, Strategy::BreadthFirst, &Budget::default(), &mut rng);

        let text = render(|out| print_path(out, &initial, &report, false));
        let lines: Vec<&str> = text.lines().filter(|l| l.starts_with("  ")).collect();
        assert_eq!(
            lines,
            vec![
                "  start    [3, 1, 2]",
                "  flip@1   [3, 2, 1]",
                "  flip@0   [1, 2, 3]",
            ]
        );
    }
}
