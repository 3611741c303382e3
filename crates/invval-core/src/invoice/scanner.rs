//! Line-scanning field extractor.
//!
//! Turns an ordered sequence of text lines into ordered key/value pairs. Each
//! line is classified in a fixed priority order:
//!
//! 1. explicit `key: value` lines,
//! 2. lines starting with an uppercase label token (`TOTAL 1,125.00`),
//! 3. section anchors (company name, `TO:`, the line-item header),
//! 4. line-item descriptions inside a line-item section.
//!
//! Two pieces of state are carried across the cursor and run independently on
//! every line: address accumulation ([`AddressMode`]) and line-item collection
//! ([`TableMode`]). Entering one never cancels the other.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::models::config::ExtractionConfig;

use super::rules::patterns::{ADDRESS_LIKE, LABEL_RUN, SECTION_BOUNDARY};
use super::rules::split_lines;

/// Keys emitted by the scanner itself (labeled lines keep their own keys).
pub mod keys {
    pub const COMPANY_NAME: &str = "Company Name";
    pub const COMPANY_ADDRESS: &str = "Company Address";
    pub const CLIENT_NAME: &str = "Client Name";
    pub const CLIENT_COMPANY: &str = "Client Company";
    pub const CLIENT_ADDRESS: &str = "Client Address";
    pub const DESCRIPTION: &str = "Description";
    pub const HOURS: &str = "Hours";
    pub const RATE: &str = "Rate";
    pub const AMOUNT: &str = "Amount";
    pub const SERVICE: &str = "Service";
    pub const PAYMENT_TERMS: &str = "Payment Terms";
}

/// Columns filled from the lines following a line-item description, in order.
const LINE_ITEM_SLOTS: [&str; 3] = [keys::HOURS, keys::RATE, keys::AMOUNT];

const CLIENT_MARKER: &str = "TO:";
const SERVICE_MARKER: &str = "FOR:";

/// A labeled value found in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Which party an address block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressTarget {
    Company,
    Client,
}

impl AddressTarget {
    pub fn key(&self) -> &'static str {
        match self {
            AddressTarget::Company => keys::COMPANY_ADDRESS,
            AddressTarget::Client => keys::CLIENT_ADDRESS,
        }
    }
}

/// Address accumulation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    Idle,
    Accumulating {
        target: AddressTarget,
        parts: Vec<String>,
    },
}

/// Line-item collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableMode {
    #[default]
    Idle,
    /// Header seen, waiting for a description line.
    Section,
    /// Description seen, assigning the following lines to hours/rate/amount.
    Item { slots_filled: usize, remaining: usize },
}

/// State carried across the line cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    address: AddressMode,
    table: TableMode,
    pairs: Vec<KeyValuePair>,
}

impl ScanState {
    pub fn address(&self) -> &AddressMode {
        &self.address
    }

    pub fn table(&self) -> TableMode {
        self.table
    }

    pub fn pairs(&self) -> &[KeyValuePair] {
        &self.pairs
    }

    fn push(&mut self, key: &str, value: &str) {
        trace!("pair {:?} = {:?}", key, value);
        self.pairs.push(KeyValuePair::new(key, value));
    }

    fn has_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|p| p.key == key)
    }

    fn start_address(&mut self, target: AddressTarget) {
        self.flush_address();
        debug!("address accumulation started for {:?}", target);
        self.address = AddressMode::Accumulating {
            target,
            parts: Vec::new(),
        };
    }

    /// Emit the buffered address and go idle. An empty buffer keeps accumulating.
    fn flush_address(&mut self) {
        let AddressMode::Accumulating { target, parts } = &self.address else {
            return;
        };
        if parts.is_empty() {
            return;
        }

        let (key, value) = (target.key(), parts.join(", "));
        self.address = AddressMode::Idle;
        self.push(key, &value);
    }

    fn collect_address(&mut self, line: &str) {
        if let AddressMode::Accumulating { parts, .. } = &mut self.address {
            if ADDRESS_LIKE.is_match(line) {
                parts.push(line.to_string());
            }
        }
    }

    /// Assign one lookahead line to the next open line-item column.
    fn fill_line_item_slot(&mut self, line: &str) {
        let TableMode::Item {
            mut slots_filled,
            remaining,
        } = self.table
        else {
            return;
        };

        let mut amount_filled = false;
        if !line.is_empty() {
            if let Some(slot) = LINE_ITEM_SLOTS.iter().copied().find(|k| !self.has_key(k)) {
                self.push(slot, line);
                slots_filled += 1;
                amount_filled = slot == keys::AMOUNT;
            }
        }

        let remaining = remaining.saturating_sub(1);
        self.table = if amount_filled || remaining == 0 {
            debug!("line item closed after {} slots", slots_filled);
            TableMode::Idle
        } else {
            TableMode::Item {
                slots_filled,
                remaining,
            }
        };
    }
}

/// How a single line was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineClass<'a> {
    Pair(&'a str, &'a str),
    CompanyAnchor,
    ClientMarker,
    TableHeader,
    Description,
    Other,
}

/// Line-scanning extractor configured with its anchors and keywords.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    company_anchors: Vec<String>,
    label_tokens: Vec<String>,
    line_item_headers: Vec<String>,
    description_keywords: Vec<String>,
    lookahead_window: usize,
    payment_terms_phrases: Vec<String>,
}

impl FieldExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            company_anchors: non_empty(&config.company_anchors),
            label_tokens: non_empty(&config.label_tokens),
            line_item_headers: non_empty(&config.line_item_headers),
            description_keywords: non_empty(&config.description_keywords)
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
            lookahead_window: config.lookahead_window,
            payment_terms_phrases: non_empty(&config.payment_terms_phrases),
        }
    }

    /// Add company-name anchors, e.g. the names of all registered vendors.
    pub fn with_company_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for anchor in anchors {
            let anchor = anchor.into();
            if !anchor.is_empty() && !self.company_anchors.contains(&anchor) {
                self.company_anchors.push(anchor);
            }
        }
        self
    }

    /// Extract pairs from newline-separated text.
    pub fn extract_text(&self, text: &str) -> Vec<KeyValuePair> {
        self.extract(&split_lines(text))
    }

    /// Extract pairs from an ordered sequence of lines.
    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Vec<KeyValuePair> {
        let mut scan = self.scan(lines);
        while scan.step() {}
        let pairs = scan.finish();

        debug!("extracted {} pairs from {} lines", pairs.len(), lines.len());
        pairs
    }

    /// Start a step-wise scan over `lines`.
    pub fn scan<'e, 'l, S: AsRef<str>>(&'e self, lines: &'l [S]) -> LineScan<'e, 'l> {
        LineScan {
            extractor: self,
            lines: lines.iter().map(|l| l.as_ref().trim()).collect(),
            cursor: 0,
            state: ScanState::default(),
        }
    }

    fn classify<'a>(&self, line: &'a str, state: &ScanState, next: Option<&str>) -> LineClass<'a> {
        if let Some((key, value)) = line.split_once(':') {
            let (key, value) = (key.trim(), value.trim());
            if !key.is_empty() && !value.is_empty() {
                return LineClass::Pair(key, value);
            }
        } else if self.label_tokens.iter().any(|t| line.starts_with(t.as_str())) {
            return match LABEL_RUN.find(line) {
                Some(run) => {
                    let key = run.as_str().trim();
                    LineClass::Pair(key, line[run.end()..].trim())
                }
                None => LineClass::Other,
            };
        }

        if self.company_anchors.iter().any(|a| line.starts_with(a.as_str())) {
            LineClass::CompanyAnchor
        } else if line == CLIENT_MARKER && next.is_some_and(|n| !n.is_empty()) {
            LineClass::ClientMarker
        } else if self.line_item_headers.iter().any(|h| h == line) {
            LineClass::TableHeader
        } else if state.table == TableMode::Section && self.is_description(line) {
            LineClass::Description
        } else {
            LineClass::Other
        }
    }

    fn is_description(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.description_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    fn is_payment_terms(&self, line: &str) -> bool {
        self.payment_terms_phrases.iter().any(|p| line.contains(p.as_str()))
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A scan in progress: the extractor, the lines, a cursor and the carried state.
pub struct LineScan<'e, 'l> {
    extractor: &'e FieldExtractor,
    lines: Vec<&'l str>,
    cursor: usize,
    state: ScanState,
}

impl<'e, 'l> LineScan<'e, 'l> {
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Process the line under the cursor. Returns false once all lines are consumed.
    pub fn step(&mut self) -> bool {
        let Some(&line) = self.lines.get(self.cursor) else {
            return false;
        };
        let i = self.cursor;
        let next = self.lines.get(i + 1).copied();
        let is_terminator = line.is_empty() || SECTION_BOUNDARY.is_match(line);

        if is_terminator {
            self.state.flush_address();
        }
        self.state.fill_line_item_slot(line);

        let mut advance = 1;
        let mut collect_address = !is_terminator;

        match self.extractor.classify(line, &self.state, next) {
            LineClass::Pair(key, value) => {
                if !value.is_empty() {
                    self.state.push(key, value);
                }
            }
            LineClass::CompanyAnchor => {
                self.state.push(keys::COMPANY_NAME, line);
                self.state.start_address(AddressTarget::Company);
                collect_address = false;
            }
            LineClass::ClientMarker => {
                if let Some(name) = next {
                    self.state.push(keys::CLIENT_NAME, name);
                    advance += 1;
                }
                if let Some(company) = self.lines.get(i + 2).filter(|l| !l.is_empty()) {
                    self.state.push(keys::CLIENT_COMPANY, company);
                    advance += 1;
                }
                self.state.start_address(AddressTarget::Client);
                collect_address = false;
            }
            LineClass::TableHeader => {
                debug!("line-item section entered at line {}", i);
                self.state.table = TableMode::Section;
                collect_address = false;
            }
            LineClass::Description => {
                self.state.push(keys::DESCRIPTION, line);
                self.state.table = if self.extractor.lookahead_window == 0 {
                    TableMode::Idle
                } else {
                    TableMode::Item {
                        slots_filled: 0,
                        remaining: self.extractor.lookahead_window,
                    }
                };
            }
            LineClass::Other => {}
        }

        if collect_address {
            self.state.collect_address(line);
        }

        if line == SERVICE_MARKER {
            if let Some(service) = next.filter(|n| !n.is_empty()) {
                self.state.push(keys::SERVICE, service);
            }
        }

        if self.extractor.is_payment_terms(line) {
            self.state.push(keys::PAYMENT_TERMS, line);
        }

        self.cursor += advance;
        true
    }

    /// Flush any open address block and return the pairs.
    pub fn finish(mut self) -> Vec<KeyValuePair> {
        self.state.flush_address();
        self.state.pairs
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| !v.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(lines: &[&str]) -> Vec<KeyValuePair> {
        FieldExtractor::new().extract(lines)
    }

    fn kv(key: &str, value: &str) -> KeyValuePair {
        KeyValuePair::new(key, value)
    }

    #[test]
    fn test_empty_input() {
        assert!(pairs(&[]).is_empty());
    }

    #[test]
    fn test_explicit_delimiter() {
        assert_eq!(pairs(&["TOTAL: $1234.56"]), vec![kv("TOTAL", "$1234.56")]);
    }

    #[test]
    fn test_delimiter_splits_at_first_colon() {
        assert_eq!(pairs(&["Time: 10:30"]), vec![kv("Time", "10:30")]);
    }

    #[test]
    fn test_delimiter_with_empty_side_is_dropped() {
        assert!(pairs(&["Notes:", ": orphan"]).is_empty());
    }

    #[test]
    fn test_labeled_line_without_delimiter() {
        assert_eq!(
            pairs(&["INVOICE #00012", "TOTAL DUE 1,125.00", "HOURS"]),
            vec![kv("INVOICE", "#00012"), kv("TOTAL DUE", "1,125.00")]
        );
    }

    #[test]
    fn test_company_address_block() {
        let lines = [
            "Market Financial Consulting",
            "450 East 78th Ave",
            "Denver, CO 12345",
            "",
            "Phone: (123) 456-7890",
        ];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Company Name", "Market Financial Consulting"),
                kv("Company Address", "450 East 78th Ave, Denver, CO 12345"),
                kv("Phone", "(123) 456-7890"),
            ]
        );
    }

    #[test]
    fn test_boundary_line_flushes_before_its_pair() {
        let lines = ["Market Financial Consulting", "450 East 78th Ave", "Phone: 555"];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Company Name", "Market Financial Consulting"),
                kv("Company Address", "450 East 78th Ave"),
                kv("Phone", "555"),
            ]
        );
    }

    #[test]
    fn test_client_block() {
        let lines = [
            "TO:",
            "Alex Chen",
            "Acme Corp",
            "123 Main St",
            "Springfield, IL 62701",
            "",
        ];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Client Name", "Alex Chen"),
                kv("Client Company", "Acme Corp"),
                kv("Client Address", "123 Main St, Springfield, IL 62701"),
            ]
        );
    }

    #[test]
    fn test_client_marker_without_following_line() {
        assert!(pairs(&["TO:"]).is_empty());
        assert!(pairs(&["TO:", ""]).is_empty());
    }

    #[test]
    fn test_address_flushed_at_end_of_input() {
        let lines = ["TO:", "Alex Chen", "Acme Corp", "123 Main St"];

        assert_eq!(
            pairs(&lines).last(),
            Some(&kv("Client Address", "123 Main St"))
        );
    }

    #[test]
    fn test_terminator_before_first_part_keeps_accumulating() {
        let lines = ["Market Financial Consulting", "", "450 East 78th Ave", ""];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Company Name", "Market Financial Consulting"),
                kv("Company Address", "450 East 78th Ave"),
            ]
        );
    }

    #[test]
    fn test_line_item_lookahead() {
        let lines = [
            "DESCRIPTION",
            "Consultation services",
            "3.0",
            "375.00",
            "1,125.00",
            "999",
        ];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Description", "Consultation services"),
                kv("Hours", "3.0"),
                kv("Rate", "375.00"),
                kv("Amount", "1,125.00"),
            ]
        );
    }

    #[test]
    fn test_line_item_window_runs_out_before_amount() {
        let lines = ["DESCRIPTION", "Consultation services", "3", "", "", "1125"];

        let extractor = FieldExtractor::new();
        let mut scan = extractor.scan(&lines);
        while scan.cursor() < 4 {
            scan.step();
        }
        assert_eq!(
            scan.state().table(),
            TableMode::Item { slots_filled: 1, remaining: 1 }
        );

        scan.step();
        assert_eq!(scan.state().table(), TableMode::Idle);

        while scan.step() {}
        assert_eq!(
            scan.finish(),
            vec![
                kv("Description", "Consultation services"),
                kv("Hours", "3"),
            ]
        );
    }

    #[test]
    fn test_line_item_window_skips_blank_and_filled_slots() {
        let lines = ["Hours: 3", "DESCRIPTION", "Consultation services", "", "375.00", "1,125.00"];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Hours", "3"),
                kv("Description", "Consultation services"),
                kv("Rate", "375.00"),
                kv("Amount", "1,125.00"),
            ]
        );
    }

    #[test]
    fn test_description_requires_section() {
        assert!(pairs(&["Consultation services", "3"]).is_empty());
    }

    #[test]
    fn test_service_and_payment_terms() {
        let lines = ["FOR:", "Financial advisory", "Total due in 15 days"];

        assert_eq!(
            pairs(&lines),
            vec![
                kv("Service", "Financial advisory"),
                kv("Payment Terms", "Total due in 15 days"),
            ]
        );
    }

    #[test]
    fn test_payment_terms_inside_address_block() {
        let lines = ["TO:", "Alex Chen", "Acme Corp", "Total due in 15 days", ""];

        let result = pairs(&lines);
        assert!(result.contains(&kv("Payment Terms", "Total due in 15 days")));
        assert!(result.contains(&kv("Client Address", "Total due in 15 days")));
    }

    #[test]
    fn test_address_and_line_item_run_together() {
        let lines = [
            "TO:",
            "Alex Chen",
            "Acme Corp",
            "DESCRIPTION",
            "Consultation services",
            "3",
            "",
        ];

        let extractor = FieldExtractor::new();
        let mut scan = extractor.scan(&lines);
        while scan.cursor() < 4 {
            scan.step();
        }
        assert_eq!(scan.state().table(), TableMode::Section);
        assert!(matches!(
            scan.state().address(),
            AddressMode::Accumulating { target: AddressTarget::Client, .. }
        ));

        scan.step();
        assert_eq!(
            scan.state().table(),
            TableMode::Item { slots_filled: 0, remaining: 3 }
        );

        while scan.step() {}
        let result = scan.finish();
        assert!(result.contains(&kv("Hours", "3")));
        assert!(result.contains(&kv("Client Address", "Consultation services, 3")));
    }

    #[test]
    fn test_vendor_name_anchor() {
        let extractor = FieldExtractor::new().with_company_anchors(["Acme Plumbing"]);
        let result = extractor.extract(&["Acme Plumbing LLC", "1 Pipe Rd", ""]);

        assert_eq!(
            result,
            vec![
                kv("Company Name", "Acme Plumbing LLC"),
                kv("Company Address", "1 Pipe Rd"),
            ]
        );
    }

    #[test]
    fn test_extract_text_trims_lines() {
        let result = FieldExtractor::new().extract_text("  TOTAL: $10.00  \r\n");
        assert_eq!(result, vec![kv("TOTAL", "$10.00")]);
    }
}
