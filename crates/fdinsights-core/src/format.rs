//! Currency formatting for display
//!
//! Amounts are shown in Indian Rupees with Indian digit grouping: the last
//! three integer digits form one group, every group before that has two
//! (`₹12,34,567.89`).

/// Format an amount as INR with two decimals
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("₹{}", amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // "-0.00" would otherwise keep its sign
    let negative = amount < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };

    format!("{}₹{}.{}", sign, group_indian(int_part), frac_part)
}

/// Insert Indian-style thousands separators into a string of digits
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}
