/// The classic numbered light styles.
pub const DEFAULT_STYLES: &[(u32, &str)] = &[
    // Normal
    (0, "m"),
    // Flicker
    (1, "mmnmmommommnonmmonqnmmo"),
    // Slow strong pulse
    (2, "abcdefghijklmnopqrstuvwxyzyxwvutsrqponmlkjihgfedcba"),
    // Candle
    (3, "mmmmmaaaaammmmmaaaaaabcdefgabcdefg"),
    // Fast strobe
    (4, "mamamamamama"),
    // Gentle pulse
    (5, "jklmnopqrstuvwxyzyxwvutsrqponmlkj"),
    // Flicker, second variety
    (6, "nmonqnmomnmomomno"),
    // Candle, second variety
    (7, "mmmaaaabcdefgmmmmaaaammmaamm"),
    // Candle, third variety
    (8, "mmmaaammmaaammmabcdefaaaammmmabcdefmmmaaaa"),
    // Slow strobe
    (9, "aaaaaaaazzzzzzzz"),
    // Fluorescent flicker
    (10, "mmamammmmammamamaaamammma"),
    // Slow pulse, not fading to black
    (11, "abcdefghijklmnopqrrqponmlkjihgfedcba"),
    // Off
    (63, "a"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    #[test]
    fn every_default_pattern_is_valid() {
        for (id, sequence) in DEFAULT_STYLES {
            assert!(Pattern::parse(sequence).is_ok(), "style {id}");
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<u32> = DEFAULT_STYLES.iter().map(|(id, _)| *id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 13);
    }
}
