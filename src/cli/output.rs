//! Output formatting for CLI

use crate::pipeline::MatchResult;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a fraction as a percentage with one decimal
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the outcome counts of a finished match
pub fn print_match_result(result: &MatchResult) {
    print_section("Results");
    print_kv("Games", &format_number(result.total_games));
    print_kv(
        "Player A wins",
        &format!("{} ({})", result.a_wins, format_percent(result.a_win_rate())),
    );
    print_kv(
        "Player B wins",
        &format!("{} ({})", result.b_wins, format_percent(result.b_win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", result.draws, format_percent(result.draw_rate())),
    );
    if result.excluded_exploring > 0 {
        print_kv(
            "Exploring games",
            &format!(
                "{} excluded; policy-only draws {}",
                result.excluded_exploring,
                format_percent(result.policy_draw_rate())
            ),
        );
    }
}
