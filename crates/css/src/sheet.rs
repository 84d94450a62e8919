//! The dynamic stylesheet handle.

use crate::config::{ApplyMode, SheetConfig};
use crate::error::{SheetError, SheetResult};
use crate::host::{Document, RuleList, StyleElement};
use crate::ids::{DEFAULT_IDS, SheetId, SheetIdAllocator};
use crate::lifecycle::{Lifecycle, Operation, SheetState};
use crate::reconcile::reconcile;
use css_diff::{ChangeSet, apply_changes, diff};
use css_model::{CompiledSheet, Processor, StyleModel, rule_text};
use log::{debug, info, warn};
use tracing::info_span;

/// A style model bound to one `<style>` element of a host document.
///
/// The caller edits the model through [`model_mut`](Self::model_mut) and
/// pushes the edits with [`update`](Self::update), which writes only what
/// changed since the last successful `apply` or `update`. The document is
/// borrowed by the operations that create, attach or remove the element;
/// it is never stored.
#[derive(Debug)]
pub struct DynamicStyleSheet<E> {
    lifecycle: Lifecycle,
    config: SheetConfig,
    model: StyleModel,
    /// The model as last written to the element.
    snapshot: Option<StyleModel>,
    element: Option<E>,
}

impl<E: StyleElement> DynamicStyleSheet<E> {
    /// Create a sheet with the next id of the process-wide allocator and the
    /// default configuration.
    pub fn new(model: StyleModel) -> Self {
        Self::from_allocator(&DEFAULT_IDS, model)
    }

    pub fn with_id(id: impl Into<SheetId>, model: StyleModel) -> Self {
        Self::with_config(id, model, SheetConfig::default())
    }

    pub fn with_config(id: impl Into<SheetId>, model: StyleModel, config: SheetConfig) -> Self {
        Self {
            lifecycle: Lifecycle::new(id.into()),
            config,
            model,
            snapshot: None,
            element: None,
        }
    }

    pub fn from_allocator(ids: &SheetIdAllocator, model: StyleModel) -> Self {
        Self::with_id(ids.next_id(), model)
    }

    pub const fn id(&self) -> &SheetId {
        self.lifecycle.id()
    }

    pub const fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub const fn state(&self) -> SheetState {
        self.lifecycle.state()
    }

    pub const fn is_registered(&self) -> bool {
        self.lifecycle.state().is_registered()
    }

    pub const fn is_active(&self) -> bool {
        self.lifecycle.state().is_active()
    }

    pub const fn model(&self) -> &StyleModel {
        &self.model
    }

    /// Mutable access to the model. Edits reach the document on the next
    /// [`update`](Self::update).
    pub const fn model_mut(&mut self) -> &mut StyleModel {
        &mut self.model
    }

    /// The model as last written to the element, if the sheet is registered.
    pub const fn snapshot(&self) -> Option<&StyleModel> {
        self.snapshot.as_ref()
    }

    pub const fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Create the style element and take the first snapshot.
    ///
    /// Does nothing when the sheet is already registered or active.
    ///
    /// # Errors
    /// Returns [`SheetError::Host`] if the document cannot create the element.
    pub fn register<D>(&mut self, document: &mut D) -> SheetResult<()>
    where
        D: Document<Element = E>,
    {
        self.lifecycle.permits(Operation::Register)?;
        if !self.state().needs_registration() {
            return Ok(());
        }
        self.element = Some(self.create_element(document)?);
        self.snapshot = Some(self.model.clone());
        self.lifecycle.complete(Operation::Register);
        debug!(target: "css::sheet", "registered stylesheet `{}`", self.id());
        Ok(())
    }

    /// Write the whole model to the style element and attach it to the
    /// document head. Registers the sheet first if needed.
    ///
    /// # Errors
    /// - [`SheetError::AlreadyApplied`] if the sheet is already active
    /// - [`SheetError::Host`] if the document rejects the element or its text
    pub fn apply<D>(&mut self, document: &mut D) -> SheetResult<()>
    where
        D: Document<Element = E>,
    {
        let _span = info_span!("css.sheet.apply", id = %self.id()).entered();
        self.lifecycle.permits(Operation::Apply)?;
        self.register(document)?;

        let mut element = match self.element.take() {
            Some(element) => element,
            None => self.create_element(document)?,
        };
        // A failed write drops the element; the next apply starts from a fresh one.
        self.write_model(&mut element)?;
        document.append_to_head(&mut element)?;

        self.element = Some(element);
        self.snapshot = Some(self.model.clone());
        self.lifecycle.complete(Operation::Apply);
        info!(
            target: "css::sheet",
            "applied stylesheet `{}` with {} selectors",
            self.id(),
            self.model.len()
        );
        Ok(())
    }

    /// Push model edits made since the last `apply`/`update` to the live rule
    /// list and return the changes that were applied.
    ///
    /// If the element exposes no rule list, its whole text is rewritten. The
    /// same happens when the host fails partway through an incremental
    /// replay, so the live list never keeps half of an update. On error the
    /// snapshot is left as it was.
    ///
    /// # Errors
    /// - [`SheetError::NotApplied`] if the sheet is not active
    /// - [`SheetError::RuleNotFound`] or [`SheetError::RuleExists`] if the
    ///   live rule list no longer matches the snapshot
    /// - [`SheetError::Host`] if the host rejects the full rewrite
    pub fn update(&mut self) -> SheetResult<ChangeSet> {
        let _span = info_span!("css.sheet.update", id = %self.id()).entered();
        self.lifecycle.permits(Operation::Update)?;

        let changes = self.snapshot.as_ref().map_or_else(
            || diff(&StyleModel::new(), &self.model),
            |previous| diff(previous, &self.model),
        );
        if changes.is_empty() {
            debug!(target: "css::sheet", "stylesheet `{}` is up to date", self.id());
            return Ok(changes);
        }

        let Some(element) = self.element.as_mut() else {
            return Err(SheetError::NotApplied {
                id: self.lifecycle.id().clone(),
                operation: Operation::Update.as_str(),
            });
        };
        if let Some(rules) = element.rules_mut() {
            match reconcile(&mut *rules, &self.model, &changes) {
                Ok(summary) => debug!(
                    target: "css::sheet",
                    "updated stylesheet `{}`: {changes} ({summary:?})",
                    self.lifecycle.id()
                ),
                Err(SheetError::Host(source)) => {
                    warn!(
                        target: "css::sheet",
                        "host failed while updating stylesheet `{}` ({source:#}); rewriting the whole sheet",
                        self.lifecycle.id()
                    );
                    rules.replace_text(&self.model.to_css(None))?;
                }
                Err(err) => return Err(err),
            }
        } else {
            warn!(
                target: "css::sheet",
                "stylesheet `{}` exposes no rule list; rewriting its text",
                self.lifecycle.id()
            );
            element.set_text(&self.model.to_css(None))?;
        }

        let snapshot = self.snapshot.get_or_insert_with(StyleModel::new);
        apply_changes(snapshot, &self.model, &changes);
        self.lifecycle.complete(Operation::Update);
        Ok(changes)
    }

    /// Remove the element from the document head and release it together
    /// with the snapshot. The sheet can be applied again afterwards.
    ///
    /// # Errors
    /// - [`SheetError::NotApplied`] if the sheet is not active
    /// - [`SheetError::Host`] if the document cannot remove the element
    pub fn detach<D>(&mut self, document: &mut D) -> SheetResult<()>
    where
        D: Document<Element = E>,
    {
        let _span = info_span!("css.sheet.detach", id = %self.id()).entered();
        self.lifecycle.permits(Operation::Detach)?;
        if let Some(mut element) = self.element.take()
            && let Err(err) = document.remove_from_head(&mut element)
        {
            self.element = Some(element);
            return Err(err.into());
        }
        self.snapshot = None;
        self.lifecycle.complete(Operation::Detach);
        info!(target: "css::sheet", "detached stylesheet `{}`", self.id());
        Ok(())
    }

    /// Re-enable a disabled sheet.
    ///
    /// # Errors
    /// Returns [`SheetError::NotApplied`] if the sheet is not active.
    pub fn enable(&mut self) -> SheetResult<()> {
        self.set_disabled(Operation::Enable, false)
    }

    /// Disable the sheet without removing it from the document.
    ///
    /// # Errors
    /// Returns [`SheetError::NotApplied`] if the sheet is not active.
    pub fn disable(&mut self) -> SheetResult<()> {
        self.set_disabled(Operation::Disable, true)
    }

    /// Whether the live rule list is disabled. `false` when there is none.
    pub fn is_disabled(&self) -> bool {
        self.element
            .as_ref()
            .and_then(StyleElement::rules)
            .is_some_and(RuleList::is_disabled)
    }

    /// Run a processor over the model.
    ///
    /// # Errors
    /// Returns [`SheetError::Processor`] if the processor fails.
    pub fn process(&mut self, processor: &dyn Processor) -> SheetResult<()> {
        processor
            .process(&mut self.model)
            .map_err(|source| SheetError::Processor {
                name: processor.name().to_owned(),
                source,
            })
    }

    /// See [`StyleModel::compile`].
    pub fn compile(&self, selector: Option<&str>) -> CompiledSheet {
        self.model.compile(selector)
    }

    /// See [`StyleModel::to_css`].
    pub fn to_css(&self, selector: Option<&str>) -> String {
        self.model.to_css(selector)
    }

    fn create_element<D>(&self, document: &mut D) -> SheetResult<E>
    where
        D: Document<Element = E>,
    {
        let element_id = self.config.element_id(self.id());
        Ok(document.create_style_element(&element_id, &self.config.media)?)
    }

    fn write_model(&self, element: &mut E) -> SheetResult<()> {
        match self.config.apply_mode {
            ApplyMode::Granular => {
                for (selector, properties) in &self.model {
                    element.append_text(&rule_text(selector, properties))?;
                }
            }
            ApplyMode::Dirty => element.append_text(&self.model.to_css(None))?,
        }
        Ok(())
    }

    fn set_disabled(&mut self, operation: Operation, disabled: bool) -> SheetResult<()> {
        self.lifecycle.permits(operation)?;
        if let Some(rules) = self.element.as_mut().and_then(StyleElement::rules_mut) {
            rules.set_disabled(disabled);
        } else {
            warn!(
                target: "css::sheet",
                "stylesheet `{}` exposes no rule list; cannot {}",
                self.lifecycle.id(),
                operation.as_str()
            );
        }
        self.lifecycle.complete(operation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{MemoryDocument, MemoryStyleElement};
    use css_model::properties;

    type Sheet = DynamicStyleSheet<MemoryStyleElement>;

    fn sheet() -> Sheet {
        let model = StyleModel::new()
            .with_selector(".a", properties([("color", "red".into())]))
            .with_selector(".b", properties([("display", "block".into())]));
        Sheet::with_id("unit", model)
    }

    #[test]
    fn register_creates_the_element_without_attaching_it() -> SheetResult<()> {
        let mut document = MemoryDocument::new();
        let mut sheet = sheet();
        sheet.register(&mut document)?;
        sheet.register(&mut document)?;

        assert_eq!(sheet.state(), SheetState::Registered);
        assert_eq!(
            sheet.element().map(StyleElement::element_id),
            Some("dynamic-style-sheet-unit")
        );
        assert!(!document.contains("dynamic-style-sheet-unit"));
        assert_eq!(sheet.snapshot(), Some(sheet.model()));
        Ok(())
    }

    #[test]
    fn granular_apply_writes_one_text_node_per_selector() -> SheetResult<()> {
        let mut document = MemoryDocument::new();
        let mut sheet = sheet();
        sheet.apply(&mut document)?;

        let nodes = sheet.element().map(MemoryStyleElement::text_nodes);
        assert_eq!(nodes, Some(&[".a{color:red}".to_owned(), ".b{display:block}".to_owned()][..]));
        assert!(sheet.is_active());
        Ok(())
    }

    #[test]
    fn dirty_apply_writes_a_single_blob() -> SheetResult<()> {
        let mut document = MemoryDocument::new();
        let config = SheetConfig::default().with_apply_mode(ApplyMode::Dirty);
        let mut sheet = Sheet::with_config("dirty", sheet().model().clone(), config);
        sheet.apply(&mut document)?;

        let nodes = sheet.element().map(MemoryStyleElement::text_nodes);
        assert_eq!(nodes, Some(&[".a{color:red}.b{display:block}".to_owned()][..]));
        Ok(())
    }

    #[test]
    fn snapshot_follows_the_model_after_update() -> SheetResult<()> {
        let mut document = MemoryDocument::new();
        let mut sheet = sheet();
        sheet.apply(&mut document)?;
        assert!(sheet.model_mut().modify_property(".a", "color", "blue"));
        sheet.model_mut().remove_selector(".b");

        let changes = sheet.update()?;

        assert_eq!(changes.len(), 2);
        assert_eq!(sheet.snapshot(), Some(sheet.model()));
        assert!(sheet.update()?.is_empty());
        Ok(())
    }

    #[test]
    fn processor_failures_name_the_processor() {
        struct Failing;
        impl Processor for Failing {
            fn name(&self) -> &str {
                "failing"
            }

            fn process(&self, _model: &mut StyleModel) -> anyhow::Result<()> {
                anyhow::bail!("boom")
            }
        }

        let mut sheet = sheet();
        let err = sheet.process(&Failing);
        assert!(matches!(err, Err(SheetError::Processor { ref name, .. }) if name == "failing"));
    }
}
