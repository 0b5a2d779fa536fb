//! Syllable counting.
//!
//! Scores that depend on syllables (FRE, FKGL, SMOG, REL) take the counter as
//! an injected [`SyllableCounter`] so callers can plug in a dictionary, a
//! language-specific hyphenator, or a plain closure. [`VowelGroupCounter`] is
//! the default heuristic.

/// Maps a single word token to its syllable count.
///
/// Implementations must be deterministic: the same word always yields the
/// same count.
pub trait SyllableCounter {
    /// Number of syllables in `word`.
    fn syllables(&self, word: &str) -> usize;
}

impl<F> SyllableCounter for F
where
    F: Fn(&str) -> usize,
{
    fn syllables(&self, word: &str) -> usize {
        self(word)
    }
}

/// Vowel-group heuristic that works for English and French prose.
///
/// Counts maximal runs of vowels (accented Latin vowels included), then drops
/// a trailing mute `e` unless the word ends in consonant + `le`. Tokens with
/// no letters (numbers, punctuation) count 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct VowelGroupCounter;

impl SyllableCounter for VowelGroupCounter {
    fn syllables(&self, word: &str) -> usize {
        if !word.chars().any(char::is_alphabetic) {
            return 0;
        }

        let chars: Vec<char> = word.chars().flat_map(char::to_lowercase).collect();
        let mut groups = 0usize;
        let mut previous_was_vowel = false;

        for &ch in &chars {
            let vowel = is_vowel(ch);
            if vowel && !previous_was_vowel {
                groups += 1;
            }
            previous_was_vowel = vowel;
        }

        if groups > 1 && ends_with_mute_e(&chars) {
            groups -= 1;
        }

        groups.max(1)
    }
}

const fn is_vowel(ch: char) -> bool {
    matches!(
        ch,
        'a' | 'e'
            | 'i'
            | 'o'
            | 'u'
            | 'y'
            | 'à'
            | 'â'
            | 'ä'
            | 'á'
            | 'é'
            | 'è'
            | 'ê'
            | 'ë'
            | 'î'
            | 'ï'
            | 'í'
            | 'ô'
            | 'ö'
            | 'ó'
            | 'ù'
            | 'û'
            | 'ü'
            | 'ú'
            | 'ÿ'
            | 'æ'
            | 'œ'
    )
}

/// A final `e` after a consonant, except in consonant + `le` endings
/// ("table", "simple") where the `le` is voiced.
fn ends_with_mute_e(chars: &[char]) -> bool {
    let [.., before, 'e'] = chars else {
        return false;
    };
    if is_vowel(*before) {
        return false;
    }
    if *before == 'l' {
        let [.., ante, 'l', 'e'] = chars else {
            return true;
        };
        return is_vowel(*ante);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_vowel_group() {
        assert_eq!(VowelGroupCounter.syllables("cat"), 1);
        assert_eq!(VowelGroupCounter.syllables("the"), 1);
        assert_eq!(VowelGroupCounter.syllables("a"), 1);
    }

    #[test]
    fn multiple_groups() {
        assert_eq!(VowelGroupCounter.syllables("hello"), 2);
        assert_eq!(VowelGroupCounter.syllables("beautiful"), 3);
        assert_eq!(VowelGroupCounter.syllables("readability"), 5);
    }

    #[test]
    fn mute_e_dropped() {
        assert_eq!(VowelGroupCounter.syllables("time"), 1);
        assert_eq!(VowelGroupCounter.syllables("chocolate"), 3);
    }

    #[test]
    fn consonant_le_kept() {
        assert_eq!(VowelGroupCounter.syllables("table"), 2);
        assert_eq!(VowelGroupCounter.syllables("simple"), 2);
        // vowel before "le" means the e is mute again
        assert_eq!(VowelGroupCounter.syllables("mobile"), 2);
    }

    #[test]
    fn accented_vowels() {
        assert_eq!(VowelGroupCounter.syllables("été"), 2);
        assert_eq!(VowelGroupCounter.syllables("école"), 2);
        assert_eq!(VowelGroupCounter.syllables("Élément"), 3);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(
            VowelGroupCounter.syllables("HELLO"),
            VowelGroupCounter.syllables("hello")
        );
    }

    #[test]
    fn non_words_count_zero() {
        assert_eq!(VowelGroupCounter.syllables(""), 0);
        assert_eq!(VowelGroupCounter.syllables("42"), 0);
        assert_eq!(VowelGroupCounter.syllables("--"), 0);
    }

    #[test]
    fn vowelless_word_counts_one() {
        assert_eq!(VowelGroupCounter.syllables("nth"), 1);
    }

    #[test]
    fn closures_are_counters() {
        let fixed = |_: &str| 4usize;
        assert_eq!(fixed.syllables("anything"), 4);
    }
}
