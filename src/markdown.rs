use crate::search::results::ResultRecord;
use crate::tools::Response;

/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
pub(crate) fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' | ']' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize text for a single Markdown line.
/// Replaces newlines (which would break list structure) with spaces.
pub(crate) fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Renders a response as a Markdown result list for terminal use.
pub fn format_response(query: &str, response: &Response) -> String {
    let body = match response {
        Response::Success(body) => body,
        Response::Export(body) => {
            return body
                .markdown
                .clone()
                .unwrap_or_else(|| format_export(&body.cache_key, &body.results));
        }
        Response::Error(err) => return format!("**Error:** {}\n", err.error),
    };

    let mut out = format!("# arXiv: {}\n\n", single_line(query));
    out.push_str(&format!(
        "{} results, page {} of {}\n\n",
        body.total,
        body.current_page,
        body.total_pages.max(1)
    ));

    if body.results.is_empty() {
        out.push_str("(No results on this page.)\n");
        return out;
    }

    for record in &body.results {
        push_record(&mut out, record);
    }
    out
}

/// Renders a full export: every record, no paging.
pub fn format_export(cache_key: &str, records: &[ResultRecord]) -> String {
    let mut out = format!("# arXiv export: {}\n\n", single_line(cache_key));
    out.push_str(&format!("{} results\n\n", records.len()));
    for record in records {
        push_record(&mut out, record);
    }
    out
}

fn push_record(out: &mut String, record: &ResultRecord) {
    out.push_str(&format!(
        "- [{}]({}) ({})\n",
        escape_md_link(&single_line(&record.title)),
        escape_md_link(&record.url),
        record.published_date
    ));
    out.push_str(&format!("  {}\n", single_line(&record.snippet)));
}
