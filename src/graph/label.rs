/// Returns `length` bus labels built from `prefix`, indexed in
/// descending order to match the MSB-first bus convention.
///
/// The special prefix `@` with a length of at most 26 yields an
/// alphabetic sequence instead; `\@` escapes a literal `@` prefix.
///
/// # Examples
/// ```
/// # use switchsim::graph::labels;
/// assert_eq!(labels("in", 4), ["in3", "in2", "in1", "in0"]);
/// assert_eq!(labels("@", 4), ["a", "b", "c", "d"]);
/// assert_eq!(labels("\\@", 2), ["@1", "@0"]);
/// ```
pub fn labels(prefix: &str, length: usize) -> Vec<String> {
    if prefix == "@" && length < 27 {
        return (0..length)
            .map(|i| char::from(b'a' + i as u8).to_string())
            .collect();
    }
    let prefix = match prefix {
        "@" => "in",
        "\\@" => "@",
        other => other,
    };
    (0..length).rev().map(|i| format!("{}{}", prefix, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_labels() {
        assert_eq!(labels("w", 3), ["w2", "w1", "w0"]);
        assert_eq!(labels("w", 0), Vec::<String>::new());
    }

    #[test]
    fn test_alphabetic_labels() {
        assert_eq!(labels("@", 3), ["a", "b", "c"]);
        assert_eq!(labels("@", 26).last().map(String::as_str), Some("z"));
    }

    #[test]
    fn test_alphabet_overflow_falls_back() {
        let long = labels("@", 27);
        assert_eq!(long[0], "in26");
        assert_eq!(long[26], "in0");
    }
}
