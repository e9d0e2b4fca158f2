//! Helpers for the `key:value` telemetry lines printed by the lock and queue
//! microbenchmarks.
//!
//! A line looks like `\tnthreads:2 \tlock:spin_lock \tcycles:2.0`: tokens are
//! separated by whitespace and every token is a key (including the trailing
//! colon) directly followed by its value. There is no quoting, so neither keys
//! nor values may contain whitespace.

use std::io::{self, BufRead};
use std::num::ParseIntError;

/// Extract the value for `key` in `line`.
///
/// `key` includes the trailing colon, so for the line
/// `"nthreads:2 op:ADD cycles:2.0"`, `extract(line, "op:")` returns `"ADD"`.
/// The value runs until the next whitespace character or the end of the line,
/// so a trailing newline is never part of it. The key must start a token:
/// `lock:` does not match inside `spin_lock:`.
pub fn extract<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    if key.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(pos) = line[from..].find(key) {
        let start = from + pos;
        let at_boundary = line[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if at_boundary {
            let rest = &line[start + key.len()..];
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            return Some(&rest[..end]);
        }
        from = start + key.len();
    }
    None
}

/// Returns `true` if `line` carries `key` with exactly `value`.
pub fn has_field(line: &str, key: &str, value: &str) -> bool {
    extract(line, key) == Some(value)
}

/// Returns `true` if `line` contains the `marker` token anywhere.
///
/// This is a plain substring search; it is how data lines are told apart from
/// the banners and thread maps the benchmarks print around them.
pub fn is_record(line: &str, marker: &str) -> bool {
    line.contains(marker)
}

/// Iterator over the record lines of a log, see [`records`].
pub struct Records<'m, R> {
    r: R,
    marker: &'m str,
    buf: Vec<u8>,
    line_no: usize,
}

/// The lines of `r` carrying `marker`, with their 1-based line numbers.
///
/// Lines are read as raw bytes and decoded lossily, so a banner with bytes
/// that are not UTF-8 is skipped like any other banner. Invalid bytes inside
/// a record line become U+FFFD. Line endings are stripped.
pub fn records<R: BufRead>(r: R, marker: &str) -> Records<'_, R> {
    Records {
        r,
        marker,
        buf: Vec::new(),
        line_no: 0,
    }
}

impl<R: BufRead> Iterator for Records<'_, R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.r.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_no += 1;
            let line = String::from_utf8_lossy(&self.buf);
            if is_record(&line, self.marker) {
                let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
                return Some(Ok((self.line_no, line)));
            }
        }
    }
}

/// Sort numeric parameter strings by their integer value, dropping duplicates.
///
/// The original strings are returned, so `"010"` stays `"010"` and keeps
/// matching the log text it came from. Values with the same integer value are
/// deduplicated keeping the first one.
pub fn sort_numeric<S: AsRef<str>>(values: &[S]) -> Result<Vec<String>, ParseIntError> {
    let mut keyed = values
        .iter()
        .map(|v| {
            let v = v.as_ref();
            v.parse::<u64>().map(|n| (n, v.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|&(n, _)| n);
    keyed.dedup_by_key(|&mut (n, _)| n);
    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}

/// Cartesian product of two string lists.
///
/// Every string of `a` is joined with every string of `b` by `delim`, with `a`
/// as the outer loop.
pub fn string_product<A, B>(a: &[A], b: &[B], delim: &str) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut out = Vec::with_capacity(a.len() * b.len());
    for s1 in a {
        for s2 in b {
            out.push(format!("{}{}{}", s1.as_ref(), delim, s2.as_ref()));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::seq::SliceRandom;

    macro_rules! extracts {
        ($line:expr, $key:expr => $val:expr) => {
            assert_eq!(extract($line, $key), $val, "extract({:?}, {:?})", $line, $key);
        };
    }

    #[test]
    fn extract_values() {
        extracts!("nthreads:2 op:ADD cycles:2.0", "op:" => Some("ADD"));
        extracts!("nthreads:2 op:ADD cycles:2.0", "nthreads:" => Some("2"));
        extracts!("nthreads:2 op:ADD cycles:2.0", "cycles:" => Some("2.0"));
        extracts!("nthreads:2 op:ADD cycles:2.0\n", "cycles:" => Some("2.0"));
        extracts!("nthreads:2 op:ADD cycles:2.0\r\n", "cycles:" => Some("2.0"));
        extracts!("nthreads:2 op:ADD", "lock:" => None);
    }

    #[test]
    fn extract_tab_separated() {
        let line = "\tnthreads:4 \tlock:spin_lock_ttas \tcycles:123.400000\n";
        extracts!(line, "nthreads:" => Some("4"));
        extracts!(line, "lock:" => Some("spin_lock_ttas"));
        extracts!(line, "cycles:" => Some("123.400000"));
    }

    #[test]
    fn extract_requires_token_start() {
        let line = "Queue:stage_ff queue_size:10 cycles_per_iter:9.0 cycles_per_iter_wo_delay:4.5";
        extracts!(line, "cycles_per_iter:" => Some("9.0"));
        extracts!(line, "cycles_per_iter_wo_delay:" => Some("4.5"));
        extracts!(line, "size:" => None);
        extracts!("spin_lock:x lock:y", "lock:" => Some("y"));
    }

    #[test]
    fn extract_empty_value() {
        extracts!("lock: cycles:1.0", "lock:" => Some(""));
        extracts!("cycles:", "cycles:" => Some(""));
    }

    #[test]
    fn field_matching() {
        let line = "Queue:stage_lam queue_size:100 nsecs_to_spin:10";
        assert!(has_field(line, "Queue:", "stage_lam"));
        assert!(has_field(line, "nsecs_to_spin:", "10"));
        assert!(!has_field(line, "nsecs_to_spin:", "1"));
        assert!(!has_field(line, "queue_size:", "1000"));
    }

    #[test]
    fn record_marker() {
        assert!(is_record("\tnthreads:1 \tlock:A", "nthreads:"));
        assert!(!is_record("Nthreads=1", "nthreads:"));
        assert!(!is_record("Thread mapping:", "Queue:"));
    }

    fn collect(text: &[u8], marker: &str) -> Vec<(usize, String)> {
        records(text, marker).collect::<io::Result<_>>().unwrap()
    }

    #[test]
    fn records_with_line_numbers() {
        let text = b"Thread mapping:\n\tnthreads:1 \tlock:A\r\n\nnthreads:2 lock:B";
        assert_eq!(
            collect(text, "nthreads:"),
            vec![
                (2, "\tnthreads:1 \tlock:A".to_string()),
                (4, "nthreads:2 lock:B".to_string()),
            ]
        );
    }

    #[test]
    fn records_skip_undecodable_banners() {
        let text = b"Thread \xff mapping\nQueue:q queue_size:1 \xfe\n";
        let recs = collect(text, "Queue:");
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].0, 2);
        assert_eq!(extract(&recs[0].1, "queue_size:"), Some("1"));
    }

    #[test]
    fn sort_numeric_not_lexicographic() {
        let sorted = sort_numeric(&["100", "10", "2"]).unwrap();
        assert_eq!(sorted, vec!["2", "10", "100"]);
    }

    #[test]
    fn sort_numeric_dedup() {
        let sorted = sort_numeric(&["10", "1", "10", "1000", "1"]).unwrap();
        assert_eq!(sorted, vec!["1", "10", "1000"]);
    }

    #[test]
    fn sort_numeric_any_order() {
        let expected = vec!["1", "10", "100", "200", "500", "1000", "2000"];
        let mut values = expected.clone();
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            values.shuffle(&mut rng);
            assert_eq!(sort_numeric(&values).unwrap(), expected);
        }
    }

    #[test]
    fn sort_numeric_rejects_garbage() {
        assert!(sort_numeric(&["10", "ten"]).is_err());
    }

    #[test]
    fn product() {
        let cols = string_product(&["stage_ff", "stage_lam"], &["1", "10"], "+");
        assert_eq!(
            cols,
            vec!["stage_ff+1", "stage_ff+10", "stage_lam+1", "stage_lam+10"]
        );
        assert!(string_product::<&str, &str>(&[], &["1"], "+").is_empty());
    }
}
