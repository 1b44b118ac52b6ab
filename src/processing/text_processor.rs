//! Text processing and normalization shared by the matching pipeline

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lowercase, replace non-word characters with spaces, collapse whitespace.
    pub fn clean_text(&self, text: &str) -> String {
        let normalized = normalize_unicode(text).to_lowercase();
        let replaced: String = normalized
            .chars()
            .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
            .collect();
        replaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Tokenize cleaned text into words, dropping stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean_text(text)
            .unicode_words()
            .filter(|word| !self.stop_words.contains(word))
            .map(|word| word.to_string())
            .collect()
    }

    /// Word n-grams for every `n` in `min_n..=max_n`, built after stop-word removal.
    pub fn ngrams(&self, text: &str, min_n: usize, max_n: usize) -> Vec<String> {
        let tokens = self.tokenize(text);
        let mut grams = Vec::new();

        for n in min_n.max(1)..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                grams.push(window.join(" "));
            }
        }

        grams
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// Regex `\w` equivalent.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `haystack[start..end]` is not glued to a word character on either side.
pub fn is_whole_word(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = haystack[end..]
        .chars()
        .next()
        .map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

/// Byte offsets of every whole-word occurrence of `needle` in `haystack`.
///
/// Both arguments are expected to be lowercased already.
pub fn find_whole_word(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(needle)
        .filter(|(start, _)| is_whole_word(haystack, *start, start + needle.len()))
        .map(|(start, _)| start)
        .collect()
}

/// Slice `width` characters on each side of `[start, end)`.
///
/// `start` and `end` are byte offsets on char boundaries.
pub fn context_window(text: &str, start: usize, end: usize, width: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(width)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(width)
        .map_or(text.len(), |(i, _)| end + i);
    text[from..to].trim().to_string()
}

/// Split text into clauses at sentence ends, semicolons and line breaks.
///
/// `.`, `!` and `?` end a clause only before whitespace or the end of text,
/// so dotted names like `node.js` stay whole.
pub fn split_clauses(text: &str) -> Vec<&str> {
    let mut clauses = Vec::new();
    let mut from = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let boundary = match c {
            ';' | '\n' => true,
            '.' | '!' | '?' => chars.peek().map_or(true, |(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            clauses.push(&text[from..i]);
            from = i + c.len_utf8();
        }
    }
    clauses.push(&text[from..]);

    clauses
        .into_iter()
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect()
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            _ => c,
        })
        .collect()
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could",
    "do", "done", "down", "due", "during", "each", "eg", "either", "else", "elsewhere",
    "enough", "etc", "even", "ever", "every", "everyone", "everything", "everywhere",
    "except", "few", "for", "former", "formerly", "from", "further", "get", "give", "go",
    "had", "has", "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby",
    "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "ie", "if", "in", "inc", "indeed", "into", "is", "it", "its", "itself", "keep",
    "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may", "me",
    "meanwhile", "might", "mine", "more", "moreover", "most", "mostly", "move", "much",
    "must", "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no",
    "nobody", "none", "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off",
    "often", "on", "once", "only", "onto", "or", "other", "others", "otherwise", "our",
    "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please", "put", "rather",
    "re", "same", "see", "seem", "seemed", "seeming", "seems", "several", "she", "should",
    "since", "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves",
    "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout",
    "thru", "thus", "to", "together", "too", "toward", "towards", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
    "whereupon", "wherever", "whether", "which", "while", "whither", "who", "whoever",
    "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];
