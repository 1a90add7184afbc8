use super::stats::WeeklyStats;

const EMPTY_REPORT: &str = "📊 **Weekly Report**\n\nNo messages were logged this week!";

/// Render stats as the chat-formatted weekly report.
///
/// Pure function of its input; absent leaders drop their line.
pub fn format_report(stats: &WeeklyStats) -> String {
    if stats.is_empty() {
        return EMPTY_REPORT.to_string();
    }

    let mut out = String::from("📊 **Weekly Report - Last 7 Days**\n\n");
    out.push_str(&format!("💬 **Total Messages:** {}\n", group_thousands(stats.total_messages)));

    if let Some(chatter) = &stats.top_chatter {
        out.push_str(&format!(
            "🏆 **Top Chatter:** <@{}> ({} messages)\n",
            chatter.user_id, chatter.count
        ));
    }
    if let Some(channel) = &stats.most_active_channel {
        out.push_str(&format!(
            "📢 **Most Active Channel:** #{} ({} messages)\n",
            channel.channel_name, channel.count
        ));
    }
    out.push_str(&format!("🔥 **Most Discussed Topic:** {}\n", stats.most_discussed_topic));
    out
}

/// `1234567` -> `1,234,567`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
