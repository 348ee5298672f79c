// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use ar_cli::build::BuildArgs;
use ar_cli::discover::{format_row, DiscoverArgs};
use ar_cli::probe::ProbeArgs;
use ar_cli::HeadArgs;
use ar_client::{
    AccurevClient, ClientError, ClientResult, Depot, Element, Stream, StreamKind, Transaction,
};
use ar_scm::AccurevSource;
use chrono::{TimeZone, Utc};

/// Depot "Sample": streams Main (txn 12) and Dev (txn 9), snapshot Rel_1 (txn 5).
/// Only Main carries a Jenkinsfile.
struct SampleServer;

impl AccurevClient for SampleServer {
    fn fetch_depot(&self, name: &str) -> ClientResult<Option<Depot>> {
        Ok((name == "Sample").then(|| Depot {
            number: 1,
            name: name.to_string(),
            case_sensitive: false,
        }))
    }

    fn list_streams(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        Ok(vec![
            Stream::new(depot, "Sample", StreamKind::Normal),
            Stream::new(depot, "Main", StreamKind::Normal),
            Stream::new(depot, "Dev", StreamKind::Gated),
            Stream::new(depot, "ws_alice", StreamKind::Workspace),
            Stream::new(depot, "Rel_1", StreamKind::Snapshot),
        ])
    }

    fn list_snapshots(&self, depot: &str) -> ClientResult<Vec<Stream>> {
        Ok(vec![Stream::new(depot, "Rel_1", StreamKind::Snapshot)])
    }

    fn fetch_transaction(&self, _depot: &str, stream: &str) -> ClientResult<Transaction> {
        let id = match stream {
            "Sample" => 1,
            "Main" => 12,
            "Dev" => 9,
            "Rel_1" => 5,
            _ => return Err(ClientError::NotFound(stream.to_string())),
        };
        let time = Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap();
        Ok(Transaction::new(id, time))
    }

    fn stat_element(
        &self,
        _depot: &str,
        stream: &str,
        path: &str,
        _at: Option<u64>,
    ) -> ClientResult<Option<Element>> {
        Ok(match (stream, path) {
            ("Main", "Jenkinsfile") => Some(Element::new(path, "(backed)")),
            ("Main", "src") => Some(Element::directory(path, "(backed)")),
            _ => None,
        })
    }

    fn list_children(
        &self,
        _depot: &str,
        stream: &str,
        dir: &str,
        _at: Option<u64>,
    ) -> ClientResult<Vec<Element>> {
        if stream == "Main" && dir.is_empty() {
            Ok(vec![
                Element::new("Jenkinsfile", "(backed)"),
                Element::directory("src", "(backed)"),
            ])
        } else {
            Ok(Vec::new())
        }
    }

    fn cat_file(
        &self,
        _depot: &str,
        _stream: &str,
        path: &str,
        _at: Option<u64>,
    ) -> ClientResult<Vec<u8>> {
        Ok(format!("// {path}\n").into_bytes())
    }
}

fn source() -> AccurevSource {
    AccurevSource::new("accurev://localhost:5050", "Sample")
}

fn discover_args() -> DiscoverArgs {
    DiscoverArgs {
        depot: Vec::new(),
        require_file: None,
        limit: None,
        json: false,
    }
}

fn head(name: &str, snapshot: bool) -> HeadArgs {
    HeadArgs {
        stream: name.to_string(),
        snapshot,
    }
}

#[test]
fn discover_reports_stream_heads() {
    let mut lines: Vec<String> = Vec::new();
    let found = discover_args()
        .discover_depot(&SampleServer, &source(), &mut lines)
        .unwrap();

    let names: Vec<_> = found.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Sample", "Main", "Dev"]);
    assert!(found.iter().all(|h| h.kind == "stream" && h.depot == "Sample"));
    assert_eq!(found[1].transaction, 12);
    assert!(format_row(&found[1]).starts_with("Sample\tstream\tMain\t12\t"));
    assert_eq!(lines.last().map(String::as_str), Some("Finished examining Sample"));
}

#[test]
fn discover_applies_file_criteria_and_limit() {
    let args = DiscoverArgs {
        require_file: Some("Jenkinsfile".to_string()),
        ..discover_args()
    };
    let found = args
        .discover_depot(&SampleServer, &source(), &mut Vec::<String>::new())
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Main");

    let limited = DiscoverArgs {
        limit: Some(1),
        ..discover_args()
    };
    let found = limited
        .discover_depot(&SampleServer, &source(), &mut Vec::<String>::new())
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn discover_unknown_depot_is_empty() {
    let mut lines: Vec<String> = Vec::new();
    let found = discover_args()
        .discover_depot(&SampleServer, &source().with_depot("Nope"), &mut lines)
        .unwrap();
    assert!(found.is_empty());
    assert!(lines.iter().any(|l| l == "Could not find Depot: Nope"));
}

#[test]
fn discover_json_shape() {
    let found = discover_args()
        .discover_depot(&SampleServer, &source(), &mut Vec::<String>::new())
        .unwrap();
    let json = serde_json::to_value(&found[0]).unwrap();
    assert_eq!(json["name"], "Sample");
    assert_eq!(json["kind"], "stream");
    assert_eq!(json["transaction"], 1);
    assert!(json.get("last-modified").is_some());
}

#[test]
fn probe_describes_directory_and_file() {
    let source = source();
    let fs = source.create_probe(&SampleServer, ar_scm::Head::stream("Main"), None);

    let root = ProbeArgs {
        head: head("Main", false),
        path: String::new(),
        content: false,
    };
    assert_eq!(
        root.describe(&fs).unwrap(),
        "/: directory\n  Jenkinsfile\n  src/\n"
    );

    let file = ProbeArgs {
        head: head("Main", false),
        path: "Jenkinsfile".to_string(),
        content: true,
    };
    assert_eq!(file.describe(&fs).unwrap(), "Jenkinsfile: file\n// Jenkinsfile\n");

    let missing = ProbeArgs {
        head: head("Main", false),
        path: "pom.xml".to_string(),
        content: false,
    };
    assert_eq!(missing.describe(&fs).unwrap(), "pom.xml: does not exist\n");
}

#[test]
fn build_pins_requested_transaction() {
    let args = BuildArgs {
        head: head("Main", false),
        transaction: Some(7),
        latest: false,
    };
    let config = args.config_for(&source(), None).unwrap();
    assert_eq!(config.stream, "Main");
    assert_eq!(config.transaction, Some(7));
}

#[test]
fn build_latest_resolves_through_client() {
    let args = BuildArgs {
        head: head("Dev", false),
        transaction: None,
        latest: true,
    };
    let config = args.config_for(&source(), Some(&SampleServer)).unwrap();
    assert_eq!(config.transaction, Some(9));

    let snapshot = BuildArgs {
        head: head("Rel_1", true),
        transaction: None,
        latest: true,
    };
    let config = snapshot.config_for(&source(), Some(&SampleServer)).unwrap();
    assert_eq!(config.transaction, None);
}
