// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Parsers for the XML (`-fx`) output of AccuRev commands.
//!
//! All parsers are pull-based: they walk the event stream once, look only at
//! the start tags they care about, and stop at the end of the document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ClientError, ClientResult};
use crate::model::{Depot, Element, Stream, StreamKind, Transaction};
use crate::paths::{clean_path, convert_timestamp};

fn reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    reader
}

fn is_tag(start: &BytesStart<'_>, name: &str) -> bool {
    start.name().as_ref().eq_ignore_ascii_case(name.as_bytes())
}

fn attr(start: &BytesStart<'_>, name: &str) -> ClientResult<Option<String>> {
    match start.try_get_attribute(name)? {
        Some(value) => Ok(Some(value.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn parse_number<T: std::str::FromStr>(raw: Option<String>, what: &str) -> ClientResult<Option<T>> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ClientError::Parse(format!("invalid {}: {:?}", what, raw))),
        None => Ok(None),
    }
}

/// Parse `files`/`stat` output into `dest`.
///
/// Every `<element>` start tag contributes one [`Element`] with a normalized
/// location; all other tags are skipped. The return value reports whether an
/// accumulator was supplied, not whether anything was found.
pub fn parse_files(xml: &str, mut dest: Option<&mut Vec<Element>>) -> ClientResult<bool> {
    let mut reader = reader(xml);
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) | Event::Empty(start) if is_tag(&start, "element") => {
                let location = clean_path(&attr(&start, "location")?.unwrap_or_default());
                let status = attr(&start, "status")?.unwrap_or_default();
                let is_dir = attr(&start, "dir")?.is_some_and(|v| v.eq_ignore_ascii_case("yes"))
                    || attr(&start, "elemType")?.is_some_and(|v| v.eq_ignore_ascii_case("dir"));
                if let Some(dest) = dest.as_deref_mut() {
                    dest.push(Element {
                        location,
                        status,
                        is_dir,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(dest.is_some())
}

/// Parse `show depots` output
pub fn parse_depots(xml: &str) -> ClientResult<Vec<Depot>> {
    let mut reader = reader(xml);
    let mut depots = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) | Event::Empty(start) if is_tag(&start, "element") => {
                let Some(name) = attr(&start, "Name")? else {
                    continue;
                };
                let number = attr(&start, "Number")?
                    .and_then(|n| n.trim().parse::<u32>().ok())
                    .unwrap_or(0);
                let case_sensitive = attr(&start, "case")?.as_deref() == Some("sensitive");
                depots.push(Depot {
                    number,
                    name,
                    case_sensitive,
                });
            }
            _ => {}
        }
    }
    Ok(depots)
}

/// Parse `show streams` output, preserving document order
pub fn parse_streams(xml: &str, depot: &str) -> ClientResult<Vec<Stream>> {
    let mut reader = reader(xml);
    let mut streams = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) | Event::Empty(start) if is_tag(&start, "stream") => {
                let name = attr(&start, "name")?
                    .ok_or_else(|| ClientError::Parse("stream without name".to_string()))?;
                let kind = StreamKind::parse(&attr(&start, "type")?.unwrap_or_default());
                let time = attr(&start, "time")?.as_deref().and_then(convert_timestamp);
                let start_time = attr(&start, "startTime")?.as_deref().and_then(convert_timestamp);
                streams.push(Stream {
                    name,
                    number: parse_number(attr(&start, "streamNumber")?, "streamNumber")?,
                    depot: depot.to_string(),
                    basis_name: attr(&start, "basis")?,
                    basis_number: parse_number(
                        attr(&start, "basisStreamNumber")?,
                        "basisStreamNumber",
                    )?,
                    dynamic: attr(&start, "isDynamic")?.is_some_and(|v| v.eq_ignore_ascii_case("true")),
                    kind,
                    time,
                    start_time,
                });
            }
            _ => {}
        }
    }
    Ok(streams)
}

/// Parse `hist` output, newest transaction first as reported by the tool
pub fn parse_history(xml: &str) -> ClientResult<Vec<Transaction>> {
    let mut reader = reader(xml);
    let mut transactions: Vec<Transaction> = Vec::new();
    let mut in_comment = false;
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(start) | Event::Empty(start) => {
                if is_tag(&start, "transaction") {
                    let id = parse_number::<u64>(attr(&start, "id")?, "transaction id")?
                        .ok_or_else(|| ClientError::Parse("transaction without id".to_string()))?;
                    let time = attr(&start, "time")?
                        .as_deref()
                        .and_then(convert_timestamp)
                        .ok_or_else(|| {
                            ClientError::Parse(format!("transaction {} without valid time", id))
                        })?;
                    let mut transaction = Transaction::new(id, time);
                    transaction.action = attr(&start, "type")?.unwrap_or_default();
                    transaction.user = attr(&start, "user")?;
                    if transaction.action == "chstream" {
                        transaction.comment = Some("Changed Parent Stream".to_string());
                    }
                    transactions.push(transaction);
                } else if is_tag(&start, "comment") {
                    in_comment = true;
                } else if is_tag(&start, "version") {
                    if let (Some(current), Some(path)) =
                        (transactions.last_mut(), attr(&start, "path")?)
                    {
                        current.affected_paths.push(clean_path(&path));
                    }
                }
            }
            Event::Text(text) if in_comment => {
                if let Some(current) = transactions.last_mut() {
                    current.comment = Some(text.unescape()?.into_owned());
                }
            }
            Event::End(end) if end.name().as_ref().eq_ignore_ascii_case(b"comment") => {
                in_comment = false;
            }
            _ => {}
        }
    }
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files_normalizes_location() {
        let xml = r#"<elements><element location="\.\foo\bar" status="member"/></elements>"#;
        let mut elements = Vec::new();
        let supplied = parse_files(xml, Some(&mut elements)).unwrap();

        assert!(supplied);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].location, "foo/bar");
        assert_eq!(elements[0].status, "member");
        assert!(!elements[0].is_dir);
    }

    #[test]
    fn test_parse_files_without_accumulator() {
        let xml = r#"<elements><element location="\.\foo\bar" status="member"/></elements>"#;
        assert!(!parse_files(xml, None).unwrap());
    }

    #[test]
    fn test_parse_files_reports_supplied_even_when_empty() {
        let mut elements = Vec::new();
        assert!(parse_files("<AcResponse></AcResponse>", Some(&mut elements)).unwrap());
        assert!(elements.is_empty());
    }

    #[test]
    fn test_parse_files_skips_other_tags() {
        let xml = r#"<AcResponse>
            <message>ignored</message>
            <Element location="/./src" status="(backed)" dir="yes"/>
            <element location="/./src/main.rs" status="(kept)" elemType="text"></element>
        </AcResponse>"#;
        let mut elements = Vec::new();
        parse_files(xml, Some(&mut elements)).unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].location, "src");
        assert!(elements[0].is_dir);
        assert_eq!(elements[1].location, "src/main.rs");
        assert_eq!(elements[1].status, "(kept)");
    }

    #[test]
    fn test_parse_depots() {
        let xml = r#"<AcResponse>
            <Element Number="1" Name="Sample" case="sensitive"/>
            <Element Number="x" Name="Other" case="insensitive"/>
        </AcResponse>"#;
        let depots = parse_depots(xml).unwrap();

        assert_eq!(depots.len(), 2);
        assert_eq!(depots[0].name, "Sample");
        assert_eq!(depots[0].number, 1);
        assert!(depots[0].case_sensitive);
        assert_eq!(depots[1].number, 0);
        assert!(!depots[1].case_sensitive);
    }

    #[test]
    fn test_parse_streams_keeps_document_order() {
        let xml = r#"<streams>
            <stream name="Sample" depotName="Sample" streamNumber="1" type="normal" isDynamic="true" time="1500000000"/>
            <stream name="Sample_dev" basis="Sample" basisStreamNumber="1" streamNumber="3" type="gated" isDynamic="true"/>
            <stream name="Sample_ws" basis="Sample_dev" streamNumber="4" type="workspace" isDynamic="false"/>
            <stream name="Sample_1.0" basis="Sample" streamNumber="2" type="snapshot" isDynamic="false"/>
        </streams>"#;
        let streams = parse_streams(xml, "Sample").unwrap();

        let names: Vec<&str> = streams.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Sample", "Sample_dev", "Sample_ws", "Sample_1.0"]);
        assert_eq!(streams[0].kind, StreamKind::Normal);
        assert_eq!(streams[0].time.unwrap().timestamp(), 1_500_000_000);
        assert_eq!(streams[1].kind, StreamKind::Gated);
        assert_eq!(streams[1].basis_name.as_deref(), Some("Sample"));
        assert_eq!(streams[1].basis_number, Some(1));
        assert_eq!(streams[2].kind, StreamKind::Workspace);
        assert!(!streams[2].dynamic);
        assert_eq!(streams[3].kind, StreamKind::Snapshot);
        assert!(streams.iter().all(|s| s.depot == "Sample"));
    }

    #[test]
    fn test_parse_streams_rejects_bad_number() {
        let xml = r#"<streams><stream name="s" streamNumber="abc" type="normal"/></streams>"#;
        assert!(matches!(parse_streams(xml, "d"), Err(ClientError::Parse(_))));
    }

    #[test]
    fn test_parse_history() {
        let xml = r#"<AcResponse Command="hist">
            <transaction id="42" type="promote" time="1500000100" user="alice">
                <comment>Fix &amp; polish</comment>
                <version path="\.\src\lib.rs" eid="7"/>
                <version path="/./README.md" eid="8"/>
            </transaction>
        </AcResponse>"#;
        let transactions = parse_history(xml).unwrap();

        assert_eq!(transactions.len(), 1);
        let txn = &transactions[0];
        assert_eq!(txn.id, 42);
        assert_eq!(txn.action, "promote");
        assert_eq!(txn.user.as_deref(), Some("alice"));
        assert_eq!(txn.comment.as_deref(), Some("Fix & polish"));
        assert_eq!(txn.time.timestamp(), 1_500_000_100);
        assert_eq!(txn.affected_paths, vec!["src/lib.rs", "README.md"]);
    }

    #[test]
    fn test_parse_history_chstream_default_comment() {
        let xml = r#"<AcResponse><transaction id="3" type="chstream" time="1500000000" user="bob"/></AcResponse>"#;
        let transactions = parse_history(xml).unwrap();
        assert_eq!(
            transactions[0].comment.as_deref(),
            Some("Changed Parent Stream")
        );
    }

    #[test]
    fn test_parse_history_empty() {
        assert!(parse_history("<AcResponse/>").unwrap().is_empty());
    }
}
