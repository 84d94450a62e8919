//! In-memory host document.
//!
//! A headless implementation of the host traits. Style elements parse the
//! text this workspace emits (`selector{property:value;...}`) into rules when
//! they are attached, and rule lists record every operation applied to them
//! so callers can check how much work a reconciliation did.
//!
//! Rule lists are shared handles: the document keeps a handle to the list of
//! every attached element, so the live state stays observable after the
//! element moved into a sheet.

use super::{Capabilities, Document, RuleList, StyleElement};
use anyhow::{Result, anyhow, bail, ensure};
use core::cell::RefCell;
use css_model::{PropertyMap, PropertyValue, StyleModel, to_param_case};
use cssparser::{Delimiter, ParseError, Parser, ParserInput, SourcePosition, Token};
use indexmap::IndexMap;
use std::rc::Rc;

/// One parsed rule.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MemoryRule {
    pub selector: String,
    /// Hyphenated property names mapped to their textual values.
    pub declarations: IndexMap<String, String>,
}

impl MemoryRule {
    /// Parse a single `selector{declarations}` rule.
    ///
    /// # Errors
    /// Returns an error if the text is not exactly one rule.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rules = parse_rules(text)?;
        ensure!(rules.len() == 1, "expected exactly one rule in `{text}`, found {}", rules.len());
        rules.pop().ok_or_else(|| anyhow!("expected a rule in `{text}`"))
    }

    /// Serialize back to `selector{property:value;...}`.
    pub fn css_text(&self) -> String {
        let body: Vec<String> = self
            .declarations
            .iter()
            .map(|(property, value)| format!("{property}:{value}"))
            .collect();
        format!("{}{{{}}}", self.selector, body.join(";"))
    }
}

/// Parse a run of concatenated rules.
///
/// Selector text is kept byte for byte, surrounding whitespace included, so
/// it matches the model key it was written from. Declarations keep their raw
/// value text; quoted strings and parenthesized groups may hold `;`, `:` or
/// `}`.
///
/// # Errors
/// Returns an error for an unterminated rule or a rule without selector.
pub fn parse_rules(css: &str) -> Result<Vec<MemoryRule>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();
    loop {
        let start = parser.position();
        parser.skip_whitespace();
        if parser.is_exhausted() {
            break;
        }
        rules.push(parse_rule(&mut parser, start)?);
    }
    Ok(rules)
}

fn parse_rule(parser: &mut Parser<'_, '_>, start: SourcePosition) -> Result<MemoryRule> {
    loop {
        let opens_block = parser
            .next()
            .map(|token| matches!(token, Token::CurlyBracketBlock));
        match opens_block {
            Ok(true) => break,
            Ok(false) => {}
            Err(_) => bail!("missing `{{` in rule `{}`", parser.slice_from(start).trim()),
        }
    }
    let head = parser.slice_from(start);
    let selector = head.strip_suffix('{').unwrap_or(head);
    ensure!(!selector.trim().is_empty(), "rule `{head}` has no selector");

    let declarations = parser
        .parse_nested_block(|block| Ok::<_, ParseError<'_, ()>>(parse_declarations(block)))
        .map_err(|err| anyhow!("invalid block in rule `{selector}`: {:?}", err.kind))?;
    let text = parser.slice_from(start);
    ensure!(text.ends_with('}'), "unterminated rule `{}`", text.trim());

    Ok(MemoryRule {
        selector: selector.to_owned(),
        declarations,
    })
}

/// Split a declaration block on top-level semicolons.
/// Items without a property name or a value are skipped.
fn parse_declarations(block: &mut Parser<'_, '_>) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    while !block.is_exhausted() {
        if let Ok((property, value)) = block.parse_until_after(Delimiter::Semicolon, parse_declaration) {
            out.insert(property, value);
        }
    }
    out
}

fn parse_declaration<'i>(item: &mut Parser<'i, '_>) -> Result<(String, String), ParseError<'i, ()>> {
    let name_start = item.position();
    item.expect_ident()?;
    let property = item.slice_from(name_start).trim().to_owned();
    item.expect_colon()?;

    let value_start = item.position();
    while item.next_including_whitespace_and_comments().is_ok() {}
    let value = item.slice_from(value_start).trim();
    if value.is_empty() {
        return Err(item.new_custom_error(()));
    }
    Ok((property, value.to_owned()))
}

/// The shape a model takes once written into a rule list: hyphenated
/// property names and trimmed textual values. Blank values are dropped, and
/// when two spellings name the same property the later one wins.
pub fn as_written(model: &StyleModel) -> StyleModel {
    model
        .iter()
        .map(|(selector, properties)| {
            let written: PropertyMap = properties
                .iter()
                .filter_map(|(property, value)| {
                    let text = value.to_string();
                    let trimmed = text.trim();
                    (!trimmed.is_empty())
                        .then(|| (to_param_case(property), PropertyValue::Text(trimmed.to_owned())))
                })
                .collect();
            (selector.clone(), written)
        })
        .collect()
}

/// Counts of operations applied to a rule list.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OperationLog {
    pub inserted: usize,
    pub deleted: usize,
    pub properties_set: usize,
    pub properties_removed: usize,
    pub rewrites: usize,
}

impl OperationLog {
    pub const fn total(&self) -> usize {
        self.inserted + self.deleted + self.properties_set + self.properties_removed + self.rewrites
    }
}

#[derive(Debug, Default)]
struct RuleListState {
    rules: Vec<MemoryRule>,
    disabled: bool,
    capabilities: Capabilities,
    log: OperationLog,
    /// Incremental edits accepted before the host starts failing them.
    edit_budget: Option<usize>,
}

impl RuleListState {
    fn spend_edit(&mut self) -> Result<()> {
        if let Some(left) = self.edit_budget.as_mut() {
            ensure!(*left > 0, "the host rejected an incremental edit");
            *left -= 1;
        }
        Ok(())
    }
}

/// Shared handle to an in-memory rule list. Clones observe the same list.
#[derive(Clone, Debug, Default)]
pub struct MemoryRuleList {
    state: Rc<RefCell<RuleListState>>,
}

impl MemoryRuleList {
    pub fn new(capabilities: Capabilities) -> Self {
        Self {
            state: Rc::new(RefCell::new(RuleListState {
                capabilities,
                ..RuleListState::default()
            })),
        }
    }

    /// Build a list from CSS text without recording operations.
    ///
    /// # Errors
    /// Returns an error if the text cannot be parsed.
    pub fn from_css(css: &str) -> Result<Self> {
        let list = Self::default();
        list.load(parse_rules(css)?);
        Ok(list)
    }

    /// A copy of every rule in list order.
    pub fn rules(&self) -> Vec<MemoryRule> {
        self.state.borrow().rules.clone()
    }

    /// The list serialized back to CSS text, in list order.
    pub fn css_text(&self) -> String {
        self.state
            .borrow()
            .rules
            .iter()
            .map(MemoryRule::css_text)
            .collect()
    }

    /// Read the list back into a model (see [`as_written`]).
    pub fn to_model(&self) -> StyleModel {
        self.state
            .borrow()
            .rules
            .iter()
            .map(|rule| {
                let properties: PropertyMap = rule
                    .declarations
                    .iter()
                    .map(|(property, value)| (property.clone(), PropertyValue::Text(value.clone())))
                    .collect();
                (rule.selector.clone(), properties)
            })
            .collect()
    }

    pub fn operations(&self) -> OperationLog {
        self.state.borrow().log
    }

    pub fn reset_operations(&self) {
        self.state.borrow_mut().log = OperationLog::default();
    }

    /// Accept `count` more incremental edits, then fail every further one
    /// until the list is rewritten. Full rewrites are always accepted.
    pub fn reject_edits_after(&self, count: usize) {
        self.state.borrow_mut().edit_budget = Some(count);
    }

    fn load(&self, rules: Vec<MemoryRule>) {
        self.state.borrow_mut().rules = rules;
    }

    fn extend(&self, rules: Vec<MemoryRule>) {
        self.state.borrow_mut().rules.extend(rules);
    }
}

impl RuleList for MemoryRuleList {
    fn len(&self) -> usize {
        self.state.borrow().rules.len()
    }

    fn selector_text(&self, index: usize) -> Option<String> {
        self.state
            .borrow()
            .rules
            .get(index)
            .map(|rule| rule.selector.clone())
    }

    fn insert_rule(&mut self, rule: &str, index: usize) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        ensure!(state.capabilities.insert_rule, "insertRule is not supported by this host");
        state.spend_edit()?;
        ensure!(
            index <= state.rules.len(),
            "insertRule index {index} out of range (len {})",
            state.rules.len()
        );
        let parsed = MemoryRule::parse(rule)?;
        state.rules.insert(index, parsed);
        state.log.inserted += 1;
        Ok(index)
    }

    fn delete_rule(&mut self, index: usize) -> Result<()> {
        let mut state = self.state.borrow_mut();
        ensure!(state.capabilities.delete_rule, "deleteRule is not supported by this host");
        state.spend_edit()?;
        ensure!(
            index < state.rules.len(),
            "deleteRule index {index} out of range (len {})",
            state.rules.len()
        );
        state.rules.remove(index);
        state.log.deleted += 1;
        Ok(())
    }

    fn set_property(&mut self, index: usize, property: &str, value: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        ensure!(state.capabilities.edit_properties, "setProperty is not supported by this host");
        state.spend_edit()?;
        let rule = state
            .rules
            .get_mut(index)
            .ok_or_else(|| anyhow!("setProperty on missing rule {index}"))?;
        rule.declarations.insert(property.to_owned(), value.to_owned());
        state.log.properties_set += 1;
        Ok(())
    }

    fn remove_property(&mut self, index: usize, property: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        ensure!(state.capabilities.edit_properties, "removeProperty is not supported by this host");
        state.spend_edit()?;
        let rule = state
            .rules
            .get_mut(index)
            .ok_or_else(|| anyhow!("removeProperty on missing rule {index}"))?;
        rule.declarations.shift_remove(property);
        state.log.properties_removed += 1;
        Ok(())
    }

    fn replace_text(&mut self, css: &str) -> Result<()> {
        let parsed = parse_rules(css)?;
        let mut state = self.state.borrow_mut();
        state.rules = parsed;
        state.edit_budget = None;
        state.log.rewrites += 1;
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.state.borrow().disabled
    }

    fn set_disabled(&mut self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    fn capabilities(&self) -> Capabilities {
        self.state.borrow().capabilities
    }
}

/// A `<style>` element of a [`MemoryDocument`].
#[derive(Debug)]
pub struct MemoryStyleElement {
    id: String,
    media: String,
    text_nodes: Vec<String>,
    rules: MemoryRuleList,
    attached: bool,
    exposes_rules: bool,
}

impl MemoryStyleElement {
    pub fn media(&self) -> &str {
        &self.media
    }

    /// Text nodes in append order.
    pub fn text_nodes(&self) -> &[String] {
        &self.text_nodes
    }

    pub fn text_content(&self) -> String {
        self.text_nodes.concat()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl StyleElement for MemoryStyleElement {
    type Rules = MemoryRuleList;

    fn element_id(&self) -> &str {
        &self.id
    }

    fn append_text(&mut self, css: &str) -> Result<()> {
        let parsed = parse_rules(css)?;
        self.text_nodes.push(css.to_owned());
        if self.attached {
            self.rules.extend(parsed);
        }
        Ok(())
    }

    fn set_text(&mut self, css: &str) -> Result<()> {
        let parsed = parse_rules(css)?;
        self.text_nodes = vec![css.to_owned()];
        if self.attached {
            self.rules.load(parsed);
            self.rules.state.borrow_mut().log.rewrites += 1;
        }
        Ok(())
    }

    fn rules(&self) -> Option<&MemoryRuleList> {
        (self.attached && self.exposes_rules).then_some(&self.rules)
    }

    fn rules_mut(&mut self) -> Option<&mut MemoryRuleList> {
        (self.attached && self.exposes_rules).then_some(&mut self.rules)
    }
}

/// A headless document with a head that holds style elements.
#[derive(Debug)]
pub struct MemoryDocument {
    head: Vec<(String, MemoryRuleList)>,
    capabilities: Capabilities,
    exposes_rules: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self {
            head: Vec::new(),
            capabilities: Capabilities::FULL,
            exposes_rules: true,
        }
    }

    /// Rule lists of elements created from now on report these capabilities.
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Elements created from now on never expose a rule list.
    #[must_use]
    pub const fn without_rule_lists(mut self) -> Self {
        self.exposes_rules = false;
        self
    }

    pub fn contains(&self, element_id: &str) -> bool {
        self.head.iter().any(|(id, _)| id == element_id)
    }

    /// Ids of attached style elements in head order.
    pub fn head_ids(&self) -> impl Iterator<Item = &str> {
        self.head.iter().map(|(id, _)| id.as_str())
    }

    /// Shared handle to the live rules of an attached element.
    pub fn rules(&self, element_id: &str) -> Option<MemoryRuleList> {
        self.head
            .iter()
            .find(|(id, _)| id == element_id)
            .map(|(_, rules)| rules.clone())
    }
}

impl Document for MemoryDocument {
    type Element = MemoryStyleElement;

    fn create_style_element(&mut self, element_id: &str, media: &str) -> Result<MemoryStyleElement> {
        ensure!(!element_id.is_empty(), "style elements need a non-empty id");
        Ok(MemoryStyleElement {
            id: element_id.to_owned(),
            media: media.to_owned(),
            text_nodes: Vec::new(),
            rules: MemoryRuleList::new(self.capabilities),
            attached: false,
            exposes_rules: self.exposes_rules,
        })
    }

    fn append_to_head(&mut self, element: &mut MemoryStyleElement) -> Result<()> {
        ensure!(!element.attached, "style element `{}` is already attached", element.id);
        ensure!(
            !self.contains(&element.id),
            "an element with id `{}` is already in the document head",
            element.id
        );
        let mut parsed = Vec::new();
        for node in &element.text_nodes {
            parsed.extend(parse_rules(node)?);
        }
        element.rules.load(parsed);
        element.attached = true;
        self.head.push((element.id.clone(), element.rules.clone()));
        Ok(())
    }

    fn remove_from_head(&mut self, element: &mut MemoryStyleElement) -> Result<()> {
        let Some(position) = self.head.iter().position(|(id, _)| *id == element.id) else {
            bail!("style element `{}` is not in the document head", element.id);
        };
        self.head.remove(position);
        element.attached = false;
        Ok(())
    }
}
