//! `Co-authored-by` trailers for commit messages.

use super::committer::Committer;

const TRAILER_KEY: &str = "Co-authored-by";

pub fn co_author_trailer(committer: &Committer) -> String {
    format!("{TRAILER_KEY}: {committer}")
}

/// Git's `commit -v` cut line; everything from it on is dropped by git.
const SCISSORS: &str = "------------------------ >8 ------------------------";

/// Append trailers for `co_authors` to a commit message.
///
/// Trailers already present are not repeated. The trailing run of git comment
/// lines (`#`), and anything from the scissors line on, stays after the
/// trailers; `#` lines inside the body are body text. An empty message is
/// returned unchanged so git can still abort the commit.
pub fn append_co_author_trailers(message: &str, co_authors: &[Committer]) -> String {
    let lines: Vec<&str> = message.lines().collect();
    let cut = lines
        .iter()
        .position(|line| is_scissors(line))
        .unwrap_or(lines.len());
    let split = lines[..cut]
        .iter()
        .rposition(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map_or(0, |idx| idx + 1);
    let (body, tail) = lines.split_at(split);
    let comments: Vec<&str> = tail
        .iter()
        .copied()
        .skip_while(|line| line.trim().is_empty())
        .collect();

    let body = body.join("\n");
    let body = body.trim_end();
    if body.trim().is_empty() {
        return message.to_string();
    }

    let missing: Vec<String> = co_authors
        .iter()
        .map(co_author_trailer)
        .filter(|trailer| !body.lines().any(|line| line.trim() == trailer))
        .collect();
    if missing.is_empty() {
        return message.to_string();
    }

    let mut out = String::from(body);
    if ends_with_trailer_block(body) {
        out.push('\n');
    } else {
        out.push_str("\n\n");
    }
    out.push_str(&missing.join("\n"));
    out.push('\n');
    if !comments.is_empty() {
        out.push('\n');
        out.push_str(&comments.join("\n"));
        out.push('\n');
    }
    out
}

fn is_scissors(line: &str) -> bool {
    line.strip_prefix('#').is_some_and(|rest| rest.trim() == SCISSORS)
}

/// True when the last paragraph is made only of `Key: value` lines and is not
/// the subject line.
fn ends_with_trailer_block(body: &str) -> bool {
    let Some((_, last)) = body.rsplit_once("\n\n") else {
        return false;
    };
    !last.trim().is_empty() && last.lines().all(is_trailer_line)
}

fn is_trailer_line(line: &str) -> bool {
    match line.split_once(": ") {
        Some((key, value)) => {
            !key.is_empty()
                && !value.trim().is_empty()
                && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        }
        None => false,
    }
}
