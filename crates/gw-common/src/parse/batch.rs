//! Batch geneset upload parser
//!
//! A batch file describes one or more genesets. Header lines set values that
//! carry forward to every following geneset until they are replaced; each
//! geneset starts at a label line, has a name and description, then lists
//! its genes with one value each:
//!
//! ```text
//! # comment
//! ! P-Value < 0.001                      score type and threshold
//! @ Mus musculus                         species
//! % microarray Mouse Expression Array    gene identifier type or platform
//! P 19958391                             PubMed id
//! A Private                              access
//! : STR ACTI_DIFF_05                     label, starts a geneset
//! = Striatum expression correlates       name
//! + Striatum gene expression ...         description (repeatable)
//! 1419895_at  4.62954E-05                gene value
//! ```
//!
//! Parsing is a single pass through an explicit state machine
//! ([`ParserState`]). Malformed lines never abort the pass: they are
//! collected as [`ParseLineError`]s and surfaced as user messages.

use serde::Serialize;
use thiserror::Error;

use crate::parse::score::parse_score;
use crate::types::{
    GeneIdentifier, GenesetAccess, GenesetScoreType, Message, MessageResponse, Species,
};

// ============================================================================
// Types
// ============================================================================

/// Where the parser is within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserState {
    /// Between genesets: headers and labels are expected
    ExpectHeaderOrLabel,
    /// After a label, before the first gene value
    InBlockMetadata,
    /// Reading gene values
    InBlockData,
}

impl std::fmt::Display for ParserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ParserState::ExpectHeaderOrLabel => "expecting a header or label",
            ParserState::InBlockMetadata => "reading geneset metadata",
            ParserState::InBlockData => "reading gene values",
        })
    }
}

/// Identifier system of the uploaded gene column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceIdentifier {
    Gene(GeneIdentifier),
    /// Probe identifiers from a named microarray platform
    Microarray(String),
}

/// Header values in effect at some point of the file.
///
/// Never mutated in place: each header line produces a new value, and a
/// geneset keeps the copy that was current when its label was read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchHeader {
    pub score: Option<GenesetScoreType>,
    pub species: Option<Species>,
    pub gene_id_type: Option<SourceIdentifier>,
    pub pubmed_id: Option<String>,
    pub access: Option<GenesetAccess>,
}

impl BatchHeader {
    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.score.is_none() {
            missing.push("score type (!)");
        }
        if self.species.is_none() {
            missing.push("species (@)");
        }
        if self.gene_id_type.is_none() {
            missing.push("gene identifier type (%)");
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneValue {
    pub symbol: String,
    pub value: f64,
}

/// A complete geneset read from a batch file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchGeneset {
    pub label: String,
    pub name: String,
    pub description: String,
    pub score: GenesetScoreType,
    pub species: Species,
    pub gene_id_type: SourceIdentifier,
    pub pubmed_id: Option<String>,
    pub access: GenesetAccess,
    pub values: Vec<GeneValue>,
    /// Line of the label that opened this geneset
    pub line: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum LineErrorKind {
    #[error("expected a gene identifier followed by a numeric value")]
    UnrecognizedLine,

    #[error("'{0}' is not a valid number")]
    InvalidValue(String),

    #[error("invalid score header: {0}")]
    InvalidScore(String),

    #[error("unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("unknown gene identifier type '{0}'")]
    UnknownGeneIdType(String),

    #[error("access must be 'Private' or 'Public', got '{0}'")]
    InvalidAccess(String),

    #[error("PubMed id must be numeric, got '{0}'")]
    InvalidPubmedId(String),

    #[error("'{0}' line has no value")]
    EmptyValue(char),

    #[error("'{0}' line appears before any geneset label")]
    MetadataOutsideBlock(char),

    #[error("'{0}' line appears after gene values; start a new geneset with ':'")]
    MetadataAfterData(char),

    #[error("gene value appears before any geneset label or after a header")]
    DataOutsideBlock,
}

/// A malformed line. Parsing continues past it.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("line {line}: {kind}")]
pub struct ParseLineError {
    pub line: usize,
    pub state: ParserState,
    pub text: String,
    pub kind: LineErrorKind,
}

/// A geneset that was read but cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockError {
    #[error("geneset '{label}' (line {line}) is missing header(s): {}", .missing.join(", "))]
    MissingHeaders {
        label: String,
        line: usize,
        missing: Vec<&'static str>,
    },

    #[error("geneset '{label}' (line {line}) has no name (=)")]
    MissingName { label: String, line: usize },

    #[error("geneset '{label}' (line {line}) has no gene values")]
    NoValues { label: String, line: usize },
}

/// Result of one parse pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchParseOutcome {
    pub genesets: Vec<BatchGeneset>,
    pub line_errors: Vec<ParseLineError>,
    pub block_errors: Vec<BlockError>,
    pub lines_read: usize,
}

impl BatchParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.line_errors.is_empty() && self.block_errors.is_empty()
    }

    /// Messages for the upload response, in file order.
    pub fn messages(&self) -> MessageResponse {
        let mut user_messages: Vec<Message> = self
            .line_errors
            .iter()
            .map(|e| {
                Message::error(e.to_string()).with_detail(format!("{} (while {})", e.text, e.state))
            })
            .collect();
        user_messages.extend(self.block_errors.iter().map(|e| Message::error(e.to_string())));

        let system_messages = vec![Message::info(format!(
            "Read {} line(s), found {} geneset(s)",
            self.lines_read,
            self.genesets.len()
        ))];

        MessageResponse {
            user_messages,
            system_messages,
        }
    }
}

// ============================================================================
// Line classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Line<'a> {
    Blank,
    Comment,
    Score(&'a str),
    Species(&'a str),
    GeneIdType(&'a str),
    Pubmed(&'a str),
    Access(&'a str),
    Label(&'a str),
    Name(&'a str),
    Description(&'a str),
    Data(&'a str),
}

fn classify(raw: &str) -> Line<'_> {
    let text = raw.trim();
    let mut chars = text.chars();
    let Some(sigil) = chars.next() else {
        return Line::Blank;
    };
    let rest = chars.as_str();

    match sigil {
        '#' => Line::Comment,
        '!' => Line::Score(rest.trim()),
        '@' => Line::Species(rest.trim()),
        '%' => Line::GeneIdType(rest.trim()),
        ':' => Line::Label(rest.trim()),
        '=' => Line::Name(rest.trim()),
        '+' => Line::Description(rest.trim()),
        // Letter sigils need a separator, otherwise `Pam 1` would be a header
        'P' if rest.starts_with(char::is_whitespace) => Line::Pubmed(rest.trim()),
        'A' if rest.starts_with(char::is_whitespace) => Line::Access(rest.trim()),
        _ => Line::Data(text),
    }
}

fn parse_gene_value(text: &str) -> Result<GeneValue, LineErrorKind> {
    let fields: Vec<&str> = if text.contains('\t') {
        text.split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    } else {
        text.split_whitespace().collect()
    };

    let [symbol, value] = fields.as_slice() else {
        return Err(LineErrorKind::UnrecognizedLine);
    };

    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(GeneValue {
            symbol: (*symbol).to_string(),
            value: v,
        }),
        _ => Err(LineErrorKind::InvalidValue((*value).to_string())),
    }
}

fn parse_source_identifier(text: &str) -> Result<SourceIdentifier, LineErrorKind> {
    let mut words = text.splitn(2, char::is_whitespace);
    if let Some(first) = words.next() {
        if first.eq_ignore_ascii_case("microarray") {
            let platform = words.next().map(str::trim).unwrap_or_default();
            if platform.is_empty() {
                return Err(LineErrorKind::UnknownGeneIdType(text.to_string()));
            }
            return Ok(SourceIdentifier::Microarray(platform.to_string()));
        }
    }

    GeneIdentifier::from_name(text)
        .map(SourceIdentifier::Gene)
        .map_err(|_| LineErrorKind::UnknownGeneIdType(text.to_string()))
}

/// Split on `\n`, `\r` or `\r\n`, each counted as one line break.
pub fn split_lines(contents: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(contents);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(|c| c == '\r' || c == '\n') {
            Some(i) => {
                let skip = if current[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[i + skip..]).filter(|r| !r.is_empty());
                Some(&current[..i])
            },
            None => {
                rest = None;
                Some(current).filter(|c| !c.is_empty())
            },
        }
    })
}

// ============================================================================
// State machine
// ============================================================================

#[derive(Debug)]
struct OpenBlock {
    label: String,
    line: usize,
    header: BatchHeader,
    name: Vec<String>,
    description: Vec<String>,
    values: Vec<GeneValue>,
}

impl OpenBlock {
    fn new(label: &str, line: usize, header: BatchHeader) -> Self {
        Self {
            label: label.to_string(),
            line,
            header,
            name: Vec::new(),
            description: Vec::new(),
            values: Vec::new(),
        }
    }

    fn close(self) -> Result<BatchGeneset, Vec<BlockError>> {
        let mut errors = Vec::new();
        let missing = self.header.missing();
        if !missing.is_empty() {
            errors.push(BlockError::MissingHeaders {
                label: self.label.clone(),
                line: self.line,
                missing,
            });
        }
        if self.name.is_empty() {
            errors.push(BlockError::MissingName {
                label: self.label.clone(),
                line: self.line,
            });
        }
        if self.values.is_empty() {
            errors.push(BlockError::NoValues {
                label: self.label.clone(),
                line: self.line,
            });
        }

        let BatchHeader {
            score: Some(score),
            species: Some(species),
            gene_id_type: Some(gene_id_type),
            pubmed_id,
            access,
        } = self.header
        else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BatchGeneset {
            label: self.label,
            name: self.name.join(" "),
            description: self.description.join(" "),
            score,
            species,
            gene_id_type,
            pubmed_id,
            access: access.unwrap_or_default(),
            values: self.values,
            line: self.line,
        })
    }
}

/// Incremental batch parser. Feed lines in order, then call [`finish`].
///
/// [`finish`]: BatchParser::finish
#[derive(Debug)]
pub struct BatchParser {
    state: ParserState,
    header: BatchHeader,
    block: Option<OpenBlock>,
    outcome: BatchParseOutcome,
}

impl Default for BatchParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::ExpectHeaderOrLabel,
            header: BatchHeader::default(),
            block: None,
            outcome: BatchParseOutcome::default(),
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn header(&self) -> &BatchHeader {
        &self.header
    }

    /// Process one line. `line_no` is 1-based.
    pub fn feed_line(&mut self, line_no: usize, raw: &str) {
        self.outcome.lines_read = self.outcome.lines_read.max(line_no);

        match classify(raw) {
            Line::Blank | Line::Comment => {},
            Line::Score(text) => self.update_header(line_no, raw, '!', text, |header, text| {
                let score = parse_score(text).map_err(|e| LineErrorKind::InvalidScore(e.to_string()))?;
                Ok(BatchHeader {
                    score: Some(score),
                    ..header.clone()
                })
            }),
            Line::Species(text) => self.update_header(line_no, raw, '@', text, |header, text| {
                let species = Species::from_name(text)
                    .map_err(|_| LineErrorKind::UnknownSpecies(text.to_string()))?;
                Ok(BatchHeader {
                    species: Some(species),
                    ..header.clone()
                })
            }),
            Line::GeneIdType(text) => self.update_header(line_no, raw, '%', text, |header, text| {
                Ok(BatchHeader {
                    gene_id_type: Some(parse_source_identifier(text)?),
                    ..header.clone()
                })
            }),
            Line::Pubmed(text) => self.update_header(line_no, raw, 'P', text, |header, text| {
                if !text.chars().all(|c| c.is_ascii_digit()) {
                    return Err(LineErrorKind::InvalidPubmedId(text.to_string()));
                }
                Ok(BatchHeader {
                    pubmed_id: Some(text.to_string()),
                    ..header.clone()
                })
            }),
            Line::Access(text) => self.update_header(line_no, raw, 'A', text, |header, text| {
                let access = text
                    .parse::<GenesetAccess>()
                    .map_err(|_| LineErrorKind::InvalidAccess(text.to_string()))?;
                Ok(BatchHeader {
                    access: Some(access),
                    ..header.clone()
                })
            }),
            Line::Label(label) => self.open_block(line_no, label),
            Line::Name(text) => self.add_metadata(line_no, raw, '=', text),
            Line::Description(text) => self.add_metadata(line_no, raw, '+', text),
            Line::Data(text) => self.add_value(line_no, raw, text),
        }
    }

    /// Close the last geneset and return everything collected.
    pub fn finish(mut self) -> BatchParseOutcome {
        self.flush();
        tracing::debug!(
            genesets = self.outcome.genesets.len(),
            line_errors = self.outcome.line_errors.len(),
            block_errors = self.outcome.block_errors.len(),
            "Batch parse finished"
        );
        self.outcome
    }

    fn update_header<F>(&mut self, line_no: usize, raw: &str, sigil: char, text: &str, apply: F)
    where
        F: FnOnce(&BatchHeader, &str) -> Result<BatchHeader, LineErrorKind>,
    {
        if text.is_empty() {
            return self.reject(line_no, raw, LineErrorKind::EmptyValue(sigil));
        }

        match apply(&self.header, text) {
            Ok(header) => {
                self.header = header;
                if self.state == ParserState::InBlockData {
                    self.state = ParserState::ExpectHeaderOrLabel;
                }
            },
            Err(kind) => self.reject(line_no, raw, kind),
        }
    }

    fn open_block(&mut self, line_no: usize, label: &str) {
        self.flush();
        self.block = Some(OpenBlock::new(label, line_no, self.header.clone()));
        self.state = ParserState::InBlockMetadata;
    }

    fn add_metadata(&mut self, line_no: usize, raw: &str, sigil: char, text: &str) {
        if self.block.is_none() {
            return self.reject(line_no, raw, LineErrorKind::MetadataOutsideBlock(sigil));
        }
        if self.state != ParserState::InBlockMetadata {
            return self.reject(line_no, raw, LineErrorKind::MetadataAfterData(sigil));
        }
        if sigil == '=' && text.is_empty() {
            return self.reject(line_no, raw, LineErrorKind::EmptyValue(sigil));
        }

        if let Some(block) = self.block.as_mut() {
            if sigil == '=' {
                block.name.push(text.to_string());
            } else if !text.is_empty() {
                block.description.push(text.to_string());
            }
        }
    }

    fn add_value(&mut self, line_no: usize, raw: &str, text: &str) {
        let parsed = parse_gene_value(text);

        if self.block.is_none() || self.state == ParserState::ExpectHeaderOrLabel {
            // Report the shape problem first when the line is not a value either
            let kind = parsed.err().unwrap_or(LineErrorKind::DataOutsideBlock);
            return self.reject(line_no, raw, kind);
        }

        match parsed {
            Ok(value) => {
                if let Some(block) = self.block.as_mut() {
                    block.values.push(value);
                }
                self.state = ParserState::InBlockData;
            },
            Err(kind) => self.reject(line_no, raw, kind),
        }
    }

    fn flush(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };

        match block.close() {
            Ok(geneset) => self.outcome.genesets.push(geneset),
            Err(errors) => {
                for error in &errors {
                    tracing::debug!(error = %error, "Dropping incomplete batch geneset");
                }
                self.outcome.block_errors.extend(errors);
            },
        }
    }

    fn reject(&mut self, line: usize, raw: &str, kind: LineErrorKind) {
        tracing::debug!(line, state = %self.state, error = %kind, "Skipping malformed batch line");
        self.outcome.line_errors.push(ParseLineError {
            line,
            state: self.state,
            text: raw.trim().to_string(),
            kind,
        });
    }
}

/// Parse a whole batch file.
pub fn parse_batch(contents: &str) -> BatchParseOutcome {
    let mut parser = BatchParser::new();
    for (index, line) in split_lines(contents).enumerate() {
        parser.feed_line(index + 1, line);
    }
    parser.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ScoreType;
    use proptest::prelude::*;

    const HEADER: &str = "! P-Value < 0.001\n@ Mus musculus\n% microarray Mouse Expression Array 430 Set\nP 19958391\nA Private\n";

    #[test]
    fn test_classify_letter_sigils_need_separator() {
        assert_eq!(classify("P 19958391"), Line::Pubmed("19958391"));
        assert_eq!(classify("A\tPublic"), Line::Access("Public"));
        assert_eq!(classify("Pam\t1"), Line::Data("Pam\t1"));
        assert_eq!(classify("Alas2\t1"), Line::Data("Alas2\t1"));
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("#P 1"), Line::Comment);
    }

    #[test]
    fn test_parse_gene_value_forms() {
        assert_eq!(
            parse_gene_value("1419895_at  4.62954E-05").unwrap(),
            GeneValue {
                symbol: "1419895_at".into(),
                value: 4.62954e-05
            }
        );
        assert_eq!(parse_gene_value("1460595_at  3.04127e-007").unwrap().value, 3.04127e-7);
        assert_eq!(parse_gene_value("Alas2\t1").unwrap().value, 1.0);
        assert_eq!(parse_gene_value("Gene name\t0.5").unwrap().symbol, "Gene name");
        assert_eq!(parse_gene_value("Alas2"), Err(LineErrorKind::UnrecognizedLine));
        assert_eq!(
            parse_gene_value("Alas2 high"),
            Err(LineErrorKind::InvalidValue("high".into()))
        );
        assert_eq!(
            parse_gene_value("Alas2 inf"),
            Err(LineErrorKind::InvalidValue("inf".into()))
        );
    }

    #[test]
    fn test_split_lines_separators() {
        let lines: Vec<&str> = split_lines("a\r\nb\rc\nd\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
        let lines: Vec<&str> = split_lines("a\n\nb").collect();
        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn test_single_block() {
        let input = format!(
            "{HEADER}: STR ACTI\n= Striatum correlates\n+ First line.\n+ Second line.\n1419895_at  4.62954E-05\n1427431_at  5.21582E-05\n"
        );
        let outcome = parse_batch(&input);

        assert!(outcome.is_clean(), "{:?}", outcome.line_errors);
        assert_eq!(outcome.genesets.len(), 1);
        let gs = &outcome.genesets[0];
        assert_eq!(gs.label, "STR ACTI");
        assert_eq!(gs.name, "Striatum correlates");
        assert_eq!(gs.description, "First line. Second line.");
        assert_eq!(gs.score.score_type, ScoreType::PValue);
        assert_eq!(gs.score.threshold, 0.001);
        assert_eq!(gs.species, Species::MusMusculus);
        assert_eq!(
            gs.gene_id_type,
            SourceIdentifier::Microarray("Mouse Expression Array 430 Set".into())
        );
        assert_eq!(gs.pubmed_id.as_deref(), Some("19958391"));
        assert_eq!(gs.access, GenesetAccess::Private);
        assert_eq!(gs.values.len(), 2);
        assert_eq!(gs.line, 6);
    }

    #[test]
    fn test_header_change_applies_only_to_later_blocks() {
        let input = format!(
            "{HEADER}: first\n= First\n1419895_at 0.0001\n! Binary\n% Gene Symbol\n: second\n= Second\nAlas2\t1\nPam\t1\n"
        );
        let outcome = parse_batch(&input);

        assert!(outcome.is_clean(), "{:?}", outcome.line_errors);
        assert_eq!(outcome.genesets.len(), 2);
        assert_eq!(outcome.genesets[0].score.score_type, ScoreType::PValue);
        assert!(matches!(
            outcome.genesets[0].gene_id_type,
            SourceIdentifier::Microarray(_)
        ));
        assert_eq!(outcome.genesets[1].score.score_type, ScoreType::Binary);
        assert_eq!(
            outcome.genesets[1].gene_id_type,
            SourceIdentifier::Gene(GeneIdentifier::GeneSymbol)
        );
        assert_eq!(outcome.genesets[1].pubmed_id.as_deref(), Some("19958391"));
        assert_eq!(outcome.genesets[1].values[1].symbol, "Pam");
    }

    #[test]
    fn test_header_after_label_does_not_touch_open_block() {
        let input = "! Binary\n@ Mus musculus\n% Gene Symbol\n: a\n@ Homo sapiens\n= A\nAlas2\t1\n: b\n= B\nAlas2\t1\n";
        let outcome = parse_batch(input);

        assert_eq!(outcome.genesets[0].species, Species::MusMusculus);
        assert_eq!(outcome.genesets[1].species, Species::HomoSapiens);
    }

    #[test]
    fn test_carriage_return_file_matches_newline_file() {
        let input = format!("{HEADER}: a\n= A\n+ desc\n1419895_at  4.62954E-05\n");
        let cr = input.replace('\n', "\r");
        let crlf = input.replace('\n', "\r\n");

        let expected = parse_batch(&input);
        assert_eq!(parse_batch(&cr), expected);
        assert_eq!(parse_batch(&crlf), expected);
    }

    #[test]
    fn test_malformed_lines_are_recoverable() {
        let input = format!("{HEADER}: a\n= A\nAlas2\tnot-a-number\nAlas2 1\njunk\nPam 2\n");
        let outcome = parse_batch(&input);

        assert_eq!(outcome.genesets.len(), 1);
        assert_eq!(outcome.genesets[0].values.len(), 2);
        assert_eq!(outcome.line_errors.len(), 2);
        assert_eq!(outcome.line_errors[0].line, 8);
        assert_eq!(outcome.line_errors[0].state, ParserState::InBlockMetadata);
        assert_eq!(
            outcome.line_errors[0].kind,
            LineErrorKind::InvalidValue("not-a-number".into())
        );
        assert_eq!(outcome.line_errors[1].line, 10);
        assert_eq!(outcome.line_errors[1].state, ParserState::InBlockData);
        assert_eq!(outcome.line_errors[1].kind, LineErrorKind::UnrecognizedLine);
    }

    #[test]
    fn test_state_errors() {
        let input = "= Orphan name\nAlas2\t1\n! Binary\n@ Mus musculus\n% Gene Symbol\n: a\n= A\nAlas2\t1\n+ late description\n! P-Value < 0.05\nPam\t1\n";
        let outcome = parse_batch(input);
        let kinds: Vec<&LineErrorKind> = outcome.line_errors.iter().map(|e| &e.kind).collect();

        assert_eq!(
            kinds,
            vec![
                &LineErrorKind::MetadataOutsideBlock('='),
                &LineErrorKind::DataOutsideBlock,
                &LineErrorKind::MetadataAfterData('+'),
                &LineErrorKind::DataOutsideBlock,
            ]
        );
        assert_eq!(outcome.genesets.len(), 1);
        assert_eq!(outcome.genesets[0].values.len(), 1);
    }

    #[test]
    fn test_incomplete_blocks_are_dropped() {
        let input = "@ Mus musculus\n: no-score\n= Missing score\nAlas2\t1\n! Binary\n% Gene Symbol\n: no-name\nAlas2\t1\n: empty\n= Empty\n";
        let outcome = parse_batch(input);

        assert!(outcome.genesets.is_empty());
        assert_eq!(outcome.block_errors.len(), 3);
        assert!(matches!(
            &outcome.block_errors[0],
            BlockError::MissingHeaders { missing, .. } if missing.len() == 2
        ));
        assert!(matches!(&outcome.block_errors[1], BlockError::MissingName { label, .. } if label == "no-name"));
        assert!(matches!(&outcome.block_errors[2], BlockError::NoValues { line: 9, .. }));
    }

    #[test]
    fn test_invalid_headers_keep_previous_value() {
        let input = "! Binary\n! Fold > 2\n@ Felis catus\n@ Mus musculus\n% Affymetrix\n% Entrez\nP abc\nA Shared\n: a\n= A\n11287\t1\n";
        let outcome = parse_batch(input);

        assert_eq!(outcome.line_errors.len(), 5);
        let gs = &outcome.genesets[0];
        assert_eq!(gs.score.score_type, ScoreType::Binary);
        assert_eq!(gs.gene_id_type, SourceIdentifier::Gene(GeneIdentifier::Entrez));
        assert_eq!(gs.pubmed_id, None);
        assert_eq!(gs.access, GenesetAccess::Private);
    }

    #[test]
    fn test_messages_include_line_numbers() {
        let outcome = parse_batch("junk\n");
        let messages = outcome.messages();

        assert!(messages.has_errors());
        assert!(messages.user_messages[0].message.starts_with("line 1:"));
        assert_eq!(messages.system_messages.len(), 1);
    }

    #[test]
    fn test_parser_state_transitions() {
        let mut parser = BatchParser::new();
        assert_eq!(parser.state(), ParserState::ExpectHeaderOrLabel);
        parser.feed_line(1, ": a");
        assert_eq!(parser.state(), ParserState::InBlockMetadata);
        parser.feed_line(2, "Alas2\t1");
        assert_eq!(parser.state(), ParserState::InBlockData);
        parser.feed_line(3, "@ Homo sapiens");
        assert_eq!(parser.state(), ParserState::ExpectHeaderOrLabel);
        assert_eq!(parser.header().species, Some(Species::HomoSapiens));
    }

    proptest! {
        #[test]
        fn prop_parser_never_panics_and_reports_real_lines(input in "[!@%:=+#PA a-z0-9.\\-\t\r\n]{0,400}") {
            let outcome = parse_batch(&input);
            let line_count = split_lines(&input).count();
            for error in &outcome.line_errors {
                prop_assert!(error.line >= 1 && error.line <= line_count);
            }
            for gs in &outcome.genesets {
                prop_assert!(!gs.values.is_empty());
                prop_assert!(!gs.name.is_empty());
            }
        }
    }
}
