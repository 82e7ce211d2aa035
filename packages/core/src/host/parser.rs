//! Line-oriented SSH config block parser
//!
//! A two-state machine (`Outside`, `InBlock`) over the file's lines. A block
//! starts at a `Host` line and runs until the next blank line, the next
//! `Host` or `Match` line, or end of file. Everything outside blocks is kept
//! untouched so rewrites only ever replace the lines of one block.

use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::schema::{HostRecord, SshOption};

const TAGS_PREFIX: &str = "tags:";

/// One `Host` block and the line range it occupies
#[derive(Debug)]
pub(crate) struct HostBlock {
    /// Names declared on the `Host` line, comments excluded
    pub names: Vec<String>,
    /// Index of the `Host` line
    pub start: usize,
    /// Exclusive end index; trailing blank lines are not part of the block
    pub end: usize,
    /// Shared fields, or the reason the block is malformed
    pub fields: Result<HostRecord, ConfigError>,
}

impl HostBlock {
    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_multi_host(&self) -> bool {
        self.names.len() > 1
    }
}

/// A parsed config file: raw lines plus the blocks found in them
#[derive(Debug)]
pub(crate) struct ConfigDocument {
    pub path: PathBuf,
    pub lines: Vec<String>,
    pub blocks: Vec<HostBlock>,
}

enum State {
    Outside,
    InBlock(BlockBuilder),
}

struct BlockBuilder {
    start: usize,
    names: Vec<String>,
    fields: HostRecord,
    error: Option<ConfigError>,
}

impl BlockBuilder {
    fn new(start: usize, names: Vec<String>) -> Self {
        let error = names.is_empty().then(|| ConfigError::Parse {
            line: start + 1,
            message: "Host declaration without a name".to_string(),
        });
        Self {
            start,
            names,
            fields: HostRecord::default(),
            error,
        }
    }

    fn push_line(&mut self, idx: usize, line: &str) {
        if let Some(comment) = line.strip_prefix('#') {
            let comment = comment.trim();
            let is_tags = comment
                .get(..TAGS_PREFIX.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(TAGS_PREFIX));
            if is_tags {
                self.fields.tags = parse_tags(&comment[TAGS_PREFIX.len()..]);
            }
            return;
        }

        let Some((key, value)) = split_key_value(line) else {
            self.fail(idx, format!("'{line}' has no value"));
            return;
        };

        let lower = key.to_ascii_lowercase();
        if lower == "port" && self.fields.port.is_none() {
            match value.parse::<u16>() {
                Ok(port) if port != 0 => self.fields.port = Some(port),
                _ => self.fail(idx, format!("invalid port '{value}'")),
            }
            return;
        }

        let fields = &mut self.fields;
        // First occurrence wins, as in ssh; repeats are kept as plain options
        let slot = match lower.as_str() {
            "hostname" => Some(&mut fields.hostname),
            "user" => Some(&mut fields.user),
            "identityfile" => Some(&mut fields.identity_file),
            "proxyjump" => Some(&mut fields.proxy_jump),
            "remotecommand" => Some(&mut fields.remote_command),
            "requesttty" => Some(&mut fields.request_tty),
            _ => None,
        };

        match slot {
            Some(slot) if slot.is_none() => *slot = Some(value.to_string()),
            _ => fields.options.push(SshOption::new(key, value)),
        }
    }

    fn fail(&mut self, idx: usize, message: String) {
        if self.error.is_none() {
            self.error = Some(ConfigError::Parse {
                line: idx + 1,
                message,
            });
        }
    }

    fn finish(self, end: usize) -> HostBlock {
        HostBlock {
            names: self.names,
            start: self.start,
            end,
            fields: match self.error {
                Some(err) => Err(err),
                None => Ok(self.fields),
            },
        }
    }
}

impl ConfigDocument {
    /// Split config text into blocks
    pub fn parse(path: &Path, content: &str) -> Self {
        let lines: Vec<String> = content.lines().map(str::to_string).collect();
        let mut blocks = Vec::new();
        let mut state = State::Outside;

        for (idx, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            state = match state {
                State::Outside => match host_declaration(line) {
                    Some(names) => State::InBlock(BlockBuilder::new(idx, names)),
                    None => State::Outside,
                },
                State::InBlock(mut builder) => {
                    if line.is_empty() {
                        blocks.push(builder.finish(idx));
                        State::Outside
                    } else if let Some(names) = host_declaration(line) {
                        blocks.push(builder.finish(idx));
                        State::InBlock(BlockBuilder::new(idx, names))
                    } else if is_keyword(line, "match") {
                        blocks.push(builder.finish(idx));
                        State::Outside
                    } else {
                        builder.push_line(idx, line);
                        State::InBlock(builder)
                    }
                }
            };
        }

        if let State::InBlock(builder) = state {
            blocks.push(builder.finish(lines.len()));
        }

        Self {
            path: path.to_path_buf(),
            lines,
            blocks,
        }
    }

    /// Expand every well-formed block into one record per concrete name
    ///
    /// Malformed blocks are logged and skipped.
    pub fn records(&self) -> Vec<HostRecord> {
        let mut records = Vec::new();
        for block in &self.blocks {
            let fields = match &block.fields {
                Ok(fields) => fields,
                Err(err) => {
                    tracing::warn!("Skipping block in {}: {}", self.path.display(), err);
                    continue;
                }
            };
            for name in block.names.iter().filter(|n| !is_pattern(n)) {
                let mut record = fields.renamed(name.clone());
                record.source_file = self.path.clone();
                records.push(record);
            }
        }
        records
    }

    /// First block declaring `name`, like ssh's first-match rule
    pub fn find_block(&self, name: &str) -> Option<&HostBlock> {
        self.blocks.iter().find(|b| b.declares(name))
    }

    /// Names declared by any block other than the one starting at `start`
    pub fn names_outside(&self, start: usize) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .filter(move |b| b.start != start)
            .flat_map(|b| b.names.iter().map(String::as_str))
    }

    /// Render the document with lines `start..end` replaced
    pub fn splice(&self, start: usize, end: usize, replacement: &[String]) -> String {
        let mut lines: Vec<&str> = Vec::with_capacity(self.lines.len() + replacement.len());
        lines.extend(self.lines[..start].iter().map(String::as_str));
        lines.extend(replacement.iter().map(String::as_str));
        lines.extend(self.lines[end..].iter().map(String::as_str));
        join_lines(&lines)
    }

    /// Render the document with one block and one adjacent separator removed
    pub fn without_block(&self, block: &HostBlock) -> String {
        let (mut start, mut end) = (block.start, block.end);
        if self.lines.get(end).is_some_and(|l| l.trim().is_empty()) {
            end += 1;
        } else if start > 0 && self.lines[start - 1].trim().is_empty() {
            start -= 1;
        }
        self.splice(start, end, &[])
    }

    /// Render the document with a block appended after a blank separator
    pub fn with_appended(&self, block_lines: &[String]) -> String {
        let mut lines: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        if !lines.is_empty() {
            lines.push("");
        }
        lines.extend(block_lines.iter().map(String::as_str));
        join_lines(&lines)
    }
}

/// Generate the lines of a block declaring `names` with `fields`
pub(crate) fn render_block(names: &[String], fields: &HostRecord) -> Vec<String> {
    let mut lines = vec![format!("Host {}", names.join(" "))];
    let mut push = |key: &str, value: &Option<String>| {
        if let Some(value) = value {
            lines.push(format!("    {key} {value}"));
        }
    };

    push("HostName", &fields.hostname);
    push("User", &fields.user);
    push("Port", &fields.port.map(|p| p.to_string()));
    push("IdentityFile", &fields.identity_file);
    push("ProxyJump", &fields.proxy_jump);
    push("RemoteCommand", &fields.remote_command);
    push("RequestTTY", &fields.request_tty);

    for opt in &fields.options {
        lines.push(format!("    {} {}", opt.key, opt.value));
    }
    if !fields.tags.is_empty() {
        lines.push(format!("    # Tags: {}", fields.tags.join(", ")));
    }
    lines
}

/// Names a `Host` line declares, or `None` if the line is not a declaration
fn host_declaration(line: &str) -> Option<Vec<String>> {
    if !is_keyword(line, "host") {
        return None;
    }
    let rest = line[4..].trim_start_matches(|c: char| c.is_whitespace() || c == '=');
    let rest = rest.split('#').next().unwrap_or_default();
    Some(rest.split_whitespace().map(str::to_string).collect())
}

/// Check whether the line's first word is `keyword` (case-insensitive)
fn is_keyword(line: &str, keyword: &str) -> bool {
    let word_end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    line[..word_end].eq_ignore_ascii_case(keyword)
}

/// Split `Key Value` or `Key=Value`
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let key_end = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let key = &line[..key_end];
    let value = line[key_end..]
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(&line[key_end..])
        .trim();
    (!value.is_empty()).then_some((key, value))
}

fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Wildcard and negated entries are patterns, not connectable hosts
pub(crate) fn is_pattern(name: &str) -> bool {
    name.contains(['*', '?']) || name.starts_with('!')
}

fn join_lines(lines: &[&str]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> ConfigDocument {
        ConfigDocument::parse(Path::new("/tmp/config"), content)
    }

    #[test]
    fn test_multi_host_block_yields_one_record_per_name() {
        let doc = parse("Host a b c\n    HostName shared.example.com\n    User deploy\n");
        let records = doc.records();

        assert_eq!(records.len(), 3);
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        for record in &records {
            assert!(record.same_fields(&records[0]));
            assert_eq!(record.hostname.as_deref(), Some("shared.example.com"));
            assert_eq!(record.source_file, PathBuf::from("/tmp/config"));
        }
    }

    #[test]
    fn test_block_boundaries() {
        let content = "\
# global
ServerAliveInterval 60

Host one
    HostName 1.example.com
Host two
    HostName 2.example.com

Host three
    HostName 3.example.com";
        let doc = parse(content);

        assert_eq!(doc.blocks.len(), 3);
        assert_eq!((doc.blocks[0].start, doc.blocks[0].end), (3, 5));
        assert_eq!((doc.blocks[1].start, doc.blocks[1].end), (5, 7));
        assert_eq!((doc.blocks[2].start, doc.blocks[2].end), (8, 10));
    }

    #[test]
    fn test_host_line_comment_excluded_from_names() {
        let doc = parse("  host web api # production pair\n  HostName 10.0.0.1\n");
        assert_eq!(doc.blocks[0].names, vec!["web", "api"]);
    }

    #[test]
    fn test_host_keyword_with_equals() {
        let doc = parse("Host=web\nHostName=10.0.0.1\n");
        let records = doc.records();
        assert_eq!(records[0].name, "web");
        assert_eq!(records[0].hostname.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn test_recognized_keys_and_options() {
        let content = "\
Host web
    hostname web.example.com
    User deploy
    Port 2222
    IdentityFile ~/.ssh/web key
    ProxyJump bastion
    RemoteCommand tmux attach
    RequestTTY force
    ServerAliveInterval 30
    IdentityFile ~/.ssh/second
    # Tags: prod, web ,
    # unrelated comment
";
        let record = parse(content).records().remove(0);

        assert_eq!(record.hostname.as_deref(), Some("web.example.com"));
        assert_eq!(record.user.as_deref(), Some("deploy"));
        assert_eq!(record.port, Some(2222));
        assert_eq!(record.identity_file.as_deref(), Some("~/.ssh/web key"));
        assert_eq!(record.proxy_jump.as_deref(), Some("bastion"));
        assert_eq!(record.remote_command.as_deref(), Some("tmux attach"));
        assert_eq!(record.request_tty.as_deref(), Some("force"));
        assert_eq!(record.tags, vec!["prod", "web"]);
        assert_eq!(
            record.options,
            vec![
                SshOption::new("ServerAliveInterval", "30"),
                SshOption::new("IdentityFile", "~/.ssh/second"),
            ]
        );
    }

    #[test]
    fn test_non_ascii_comment_in_block() {
        let content = "\
Host web
    HostName w.example.com
    # 本番サーバ
    # tägs: not tags
    # Tags: 本番, web
";
        let records = parse(content).records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hostname.as_deref(), Some("w.example.com"));
        assert_eq!(records[0].tags, vec!["本番", "web"]);
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let content = "\
Host bad-port
    Port ssh

Host
    HostName nameless

Host no-value
    User

Host good
    HostName ok.example.com
";
        let doc = parse(content);
        assert_eq!(doc.blocks.len(), 4);
        assert!(matches!(
            doc.blocks[0].fields,
            Err(ConfigError::Parse { line: 2, .. })
        ));

        let records = doc.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "good");
    }

    #[test]
    fn test_patterns_produce_no_records() {
        let doc = parse("Host *\n    User me\n\nHost web !bad\n    HostName w\n");
        let records = doc.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "web");
        // The pattern block still exists for rewrites
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_match_line_ends_block() {
        let doc = parse("Host web\n    HostName w\nMatch host *.corp\n    User corp\n");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].end, 2);
        assert!(doc.records()[0].user.is_none());
    }

    #[test]
    fn test_render_block_round_trips() {
        let fields = HostRecord::new("")
            .with_hostname("db.internal")
            .with_user("pg")
            .with_port(5433)
            .with_identity_file("~/.ssh/db")
            .with_proxy_jump("bastion")
            .with_remote_command("psql")
            .with_request_tty("yes")
            .with_option("Compression", "yes")
            .with_tag("db")
            .with_tag("prod");
        let names = vec!["db1".to_string(), "db2".to_string()];

        let lines = render_block(&names, &fields);
        assert_eq!(lines[0], "Host db1 db2");
        assert_eq!(lines[1], "    HostName db.internal");
        assert_eq!(lines.last().unwrap(), "    # Tags: db, prod");

        let reparsed = parse(&lines.join("\n")).records();
        assert_eq!(reparsed.len(), 2);
        let mut expected = fields.renamed("db1");
        expected.source_file = PathBuf::from("/tmp/config");
        assert_eq!(reparsed[0], expected);
    }

    #[test]
    fn test_without_block_removes_separator() {
        let doc = parse("Host a\n    HostName a\n\nHost b\n    HostName b\n");
        let block = doc.find_block("a").unwrap();
        assert_eq!(doc.without_block(block), "Host b\n    HostName b\n");

        let block = doc.find_block("b").unwrap();
        assert_eq!(doc.without_block(block), "Host a\n    HostName a\n");
    }

    #[test]
    fn test_with_appended_adds_single_separator() {
        let doc = parse("Host a\n    HostName a\n\n\n");
        let out = doc.with_appended(&["Host b".to_string()]);
        assert_eq!(out, "Host a\n    HostName a\n\nHost b\n");

        let empty = parse("");
        assert_eq!(empty.with_appended(&["Host b".to_string()]), "Host b\n");
    }
}
