use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFmt {
    Pretty,
    Json,
}

impl OutputFmt {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Pretty }
    }
}

/// Print `value` as pretty JSON, or run `pretty` for the human view.
pub fn emit<T: Serialize + ?Sized>(fmt: OutputFmt, value: &T, pretty: impl FnOnce()) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("error: cannot serialize output: {e}"),
        },
        OutputFmt::Pretty => pretty(),
    }
}

/// Printable width of `s`, ignoring ANSI colour escapes.
pub fn plain_len(s: &str) -> usize {
    let mut n = 0;
    let mut esc = false;
    for c in s.chars() {
        match (esc, c) {
            (true, 'm') => esc = false,
            (true, _) => {}
            (false, '\x1B') => esc = true,
            (false, _) => n += 1,
        }
    }
    n
}

/// Print `left` column padded to a common width, then `right` after a bar.
pub fn print_columns(left: Vec<String>, right: Vec<String>, bar: &str) {
    let pad_plain = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
    for (l, r) in left.into_iter().zip(right) {
        if r.is_empty() {
            println!("{l}");
        } else {
            let pad = pad_plain + (l.chars().count() - plain_len(&l));
            println!("{:<pad$} {} {}", l, bar, r, pad = pad);
        }
    }
}
