//! Interpretation of yes/no answers from a visual question-answering model.
//!
//! Matching works on whole words so that "no" is not found inside
//! "snowman" and "is" is not found inside "this".

/// Indicators counted when the answer carries no explicit yes or no.
const POSITIVE_INDICATORS: &[&str] = &["shows", "contains", "displays", "has", "includes", "is", "showing"];
const NEGATIVE_INDICATORS: &[&str] = &["does not", "doesn't", "not visible", "not present", "not", "none"];

/// Lowercased word tokens of `text`. Apostrophes stay inside words.
fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `phrase` (one or more words) occurs in `words`.
fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
}

fn count_indicators(words: &[String], indicators: &[&str]) -> usize {
    indicators
        .iter()
        .filter(|indicator| contains_phrase(words, indicator))
        .count()
}

/// Whether `answer` says the image matches `query`.
///
/// An explicit "yes" without a "no" is a match and any explicit "no" is a
/// miss. Otherwise positive and negative indicators are weighed, and a
/// query word appearing in an answer with no negative indicator counts as
/// a match.
pub fn is_affirmative(answer: &str, query: &str) -> bool {
    let words = tokens(answer);

    let has_yes = contains_phrase(&words, "yes");
    let has_no = contains_phrase(&words, "no");
    if has_yes && !has_no {
        return true;
    }
    if has_no {
        return false;
    }

    let positive = count_indicators(&words, POSITIVE_INDICATORS);
    let negative = count_indicators(&words, NEGATIVE_INDICATORS);

    let query_words = tokens(query);
    let query_in_answer = query_words.iter().any(|q| words.contains(q));

    positive > negative || (query_in_answer && negative == 0)
}

/// Confidence carried by the wording of `answer`, in [0, 1].
pub fn judgment_confidence(answer: &str) -> f64 {
    let words = tokens(answer);
    let has = |phrase: &str| contains_phrase(&words, phrase);

    let mut confidence = 0.5;
    if has("yes") {
        confidence += 0.3;
    }
    if has("clearly") || has("definitely") {
        confidence += 0.2;
    }
    if has("exactly") || has("precisely") {
        confidence += 0.1;
    }
    if has("maybe") || has("possibly") {
        confidence -= 0.2;
    }
    if has("unclear") || has("hard to see") {
        confidence -= 0.3;
    }

    f64::clamp(confidence, 0.0, 1.0)
}

/// Strip an echoed question from a model answer.
pub fn strip_question<'a>(answer: &'a str, question: &str) -> &'a str {
    match answer.rsplit_once(question) {
        Some((_, rest)) => rest.trim(),
        None => answer.trim(),
    }
}
