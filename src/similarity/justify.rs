//! Edit scripts explaining how two names differ

use serde::{Deserialize, Serialize};

/// One step of an edit script. Positions are 0-based character offsets
/// into the original (unedited) source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Substitute { position: usize, from: char, to: char },
    /// Insert `ch` before source position `position`
    Insert { position: usize, ch: char },
    Delete { position: usize, ch: char },
}

impl EditOp {
    pub fn position(&self) -> usize {
        match self {
            EditOp::Substitute { position, .. }
            | EditOp::Insert { position, .. }
            | EditOp::Delete { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for EditOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditOp::Substitute { position, from, to } => {
                write!(f, "substitute '{}' with '{}' at position {}", from, to, position)
            }
            EditOp::Insert { position, ch } => write!(f, "insert '{}' at position {}", ch, position),
            EditOp::Delete { position, ch } => write!(f, "delete '{}' from position {}", ch, position),
        }
    }
}

/// Ordered edit script, sorted by source position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditJustification {
    ops: Vec<EditOp>,
}

impl EditJustification {
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    /// Replay the script on `source`
    pub fn apply(&self, source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut out = String::with_capacity(chars.len() + self.ops.len());
        let mut ops = self.ops.iter().peekable();

        for i in 0..=chars.len() {
            while let Some(&&EditOp::Insert { position, ch }) = ops.peek() {
                if position != i {
                    break;
                }
                out.push(ch);
                ops.next();
            }

            let Some(&current) = chars.get(i) else {
                break;
            };

            match ops.peek() {
                Some(&&EditOp::Substitute { position, to, .. }) if position == i => {
                    out.push(to);
                    ops.next();
                }
                Some(&&EditOp::Delete { position, .. }) if position == i => {
                    ops.next();
                }
                _ => out.push(current),
            }
        }

        out
    }
}

impl<'a> IntoIterator for &'a EditJustification {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

/// Derives minimal Levenshtein edit scripts.
///
/// Alignment is exact (case-sensitive) so that replaying the script
/// reproduces the target verbatim. When several scripts are minimal, a
/// substitution is preferred over an insert/delete pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditJustifier;

impl EditJustifier {
    pub fn new() -> Self {
        Self
    }

    pub fn justify(&self, a: &str, b: &str) -> EditJustification {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let table = distance_table(&a, &b);

        let mut ops = Vec::new();
        let (mut i, mut j) = (a.len(), b.len());
        while i > 0 || j > 0 {
            let here = table[i][j];
            if i > 0 && j > 0 && a[i - 1] == b[j - 1] && here == table[i - 1][j - 1] {
                i -= 1;
                j -= 1;
            } else if i > 0 && j > 0 && here == table[i - 1][j - 1] + 1 {
                ops.push(EditOp::Substitute {
                    position: i - 1,
                    from: a[i - 1],
                    to: b[j - 1],
                });
                i -= 1;
                j -= 1;
            } else if j > 0 && here == table[i][j - 1] + 1 {
                ops.push(EditOp::Insert {
                    position: i,
                    ch: b[j - 1],
                });
                j -= 1;
            } else {
                ops.push(EditOp::Delete {
                    position: i - 1,
                    ch: a[i - 1],
                });
                i -= 1;
            }
        }

        ops.reverse();
        EditJustification { ops }
    }

    /// Levenshtein distance between `a` and `b`
    pub fn distance(&self, a: &str, b: &str) -> usize {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        distance_table(&a, &b)[a.len()][b.len()]
    }
}

fn distance_table(a: &[char], b: &[char]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            table[i][j] = (table[i - 1][j - 1] + cost)
                .min(table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_insert() {
        let script = EditJustifier::new().justify("cat", "cats");
        assert_eq!(script.ops(), &[EditOp::Insert { position: 3, ch: 's' }]);
    }

    #[test]
    fn test_single_substitute() {
        let script = EditJustifier::new().justify("cat", "bat");
        assert_eq!(
            script.ops(),
            &[EditOp::Substitute { position: 0, from: 'c', to: 'b' }]
        );
    }

    #[test]
    fn test_single_delete() {
        let script = EditJustifier::new().justify("cats", "cat");
        assert_eq!(script.ops(), &[EditOp::Delete { position: 3, ch: 's' }]);
    }

    #[test]
    fn test_identical_is_empty() {
        assert!(EditJustifier::new().justify("Keto", "Keto").is_empty());
    }

    #[test]
    fn test_prefers_substitution() {
        let script = EditJustifier::new().justify("ab", "ax");
        assert_eq!(script.len(), 1);
        assert!(matches!(script.ops()[0], EditOp::Substitute { .. }));
    }

    #[test]
    fn test_script_length_is_distance() {
        let justifier = EditJustifier::new();
        for (a, b) in [("kitten", "sitting"), ("", "abc"), ("Aspirina", "Ibuprofeno")] {
            assert_eq!(justifier.justify(a, b).len(), justifier.distance(a, b));
        }
    }

    #[test]
    fn test_apply_reproduces_target() {
        let justifier = EditJustifier::new();
        for (a, b) in [
            ("kitten", "sitting"),
            ("", "abc"),
            ("abc", ""),
            ("Aspirina", "aspirinax"),
            ("Ibuprofeno", "Ibu"),
            ("abba", "baab"),
        ] {
            assert_eq!(justifier.justify(a, b).apply(a), b, "{} -> {}", a, b);
        }
    }

    #[test]
    fn test_display() {
        let op = EditOp::Insert { position: 3, ch: 's' };
        assert_eq!(op.to_string(), "insert 's' at position 3");
    }
}
