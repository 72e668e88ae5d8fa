//! Bullet-point parsing and padding shared by every summarization provider.

/// Appended by hosted providers when the model returned too few bullets.
pub const HOSTED_FILLER: &str = "• Additional insights from the article content.";

/// Appended by the local heuristic when the text has too few usable sentences.
pub const LOCAL_FILLER: &str = "Additional insights and details from the article content.";

pub const BULLET_MARKERS: [char; 3] = ['•', '-', '*'];

/// Returned when summarization fails internally.
pub const GENERIC_SUMMARY: [&str; 5] = [
    "• Article content analysis completed successfully.",
    "• Key insights have been extracted from the provided content.",
    "• The main points and takeaways have been identified.",
    "• Important information has been summarized for easy reading.",
    "• Additional details are available in the original article.",
];

pub fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(&BULLET_MARKERS[..])
}

/// Keeps the first `max_points` bullet lines of a model reply, padded with
/// [`HOSTED_FILLER`] up to `max_points`.
pub fn extract_bullets(text: &str, max_points: usize) -> Vec<String> {
    let mut points: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| is_bullet(line))
        .take(max_points)
        .map(String::from)
        .collect();
    pad_to(&mut points, max_points, HOSTED_FILLER);
    points
}

pub fn pad_to(points: &mut Vec<String>, max_points: usize, filler: &str) {
    while points.len() < max_points {
        points.push(filler.to_string());
    }
}

/// Forces a provider result to exactly `max_points` marked bullets.
pub fn normalize(mut points: Vec<String>, max_points: usize) -> Vec<String> {
    points.truncate(max_points);
    for point in points.iter_mut() {
        if !is_bullet(point) {
            *point = format!("• {}", point.trim());
        }
    }
    pad_to(&mut points, max_points, HOSTED_FILLER);
    points
}

pub fn generic_summary(max_points: usize) -> Vec<String> {
    normalize(GENERIC_SUMMARY.iter().map(|s| s.to_string()).collect(), max_points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bullets_pads_short_replies() {
        let reply = "Here is the summary:\n• First point\n- Second point\n  * Third point\nThanks!";
        let points = extract_bullets(reply, 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], "• First point");
        assert_eq!(points[1], "- Second point");
        assert_eq!(points[2], "* Third point");
        assert_eq!(points[3], HOSTED_FILLER);
        assert_eq!(points[4], HOSTED_FILLER);
    }

    #[test]
    fn test_extract_bullets_truncates_long_replies() {
        let reply = (1..=8).map(|i| format!("- point {}", i)).collect::<Vec<_>>().join("\n");
        let points = extract_bullets(&reply, 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[4], "- point 5");
    }

    #[test]
    fn test_normalize_adds_markers() {
        let points = normalize(vec!["plain".to_string(), "• marked".to_string()], 3);
        assert_eq!(points, vec!["• plain", "• marked", HOSTED_FILLER]);
    }

    #[test]
    fn test_generic_summary_respects_count() {
        assert_eq!(generic_summary(5).len(), 5);
        assert_eq!(generic_summary(3).len(), 3);
        let seven = generic_summary(7);
        assert_eq!(seven.len(), 7);
        assert!(seven.iter().all(|p| is_bullet(p)));
    }
}
