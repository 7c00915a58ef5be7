//! Sitemap parsing.
//!
//! Both the sitemap index (`<sitemapindex><sitemap><loc>`) and the url sets
//! (`<urlset><url><loc>`) are reduced to the text of their `<loc>` elements.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Collects the text of every `loc` element, in document order.
pub fn extract_locs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut locs = Vec::new();
    let mut buf = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
                current.clear();
            }
            Ok(Event::Text(e)) if in_loc => {
                let text = e
                    .unescape()
                    .map_err(|e| format!("XML Parse Error: {}", e))?;
                current.push_str(&text);
            }
            Ok(Event::CData(e)) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&e));
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let loc = current.trim();
                if !loc.is_empty() {
                    locs.push(loc.to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML Parse Error at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => (),
        }
        buf.clear();
    }

    Ok(locs)
}

/// Last non-empty path segment of a location, e.g. the ISSN of
/// `https://portal.issn.org/resource/ISSN/0003-200X`.
pub fn last_segment(loc: &str) -> Option<String> {
    match url::Url::parse(loc) {
        Ok(u) => u
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|s| s.to_string()),
        Err(_) => loc
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(|s| s.to_string()),
    }
}

/// ISSN listed in a url set.
pub fn issns_from_urlset(xml: &str) -> Result<Vec<String>, String> {
    Ok(extract_locs(xml)?
        .iter()
        .filter_map(|loc| last_segment(loc))
        .collect())
}
