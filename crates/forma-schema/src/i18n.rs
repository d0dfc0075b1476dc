//! Binding of i18n keys to display strings.
//!
//! Every `*Key` slot of a document (field ui, option labels, validation
//! messages, submit button, table columns, detail sections) is resolved
//! against a translation map and written into its literal counterpart. A
//! key with no translation resolves to the key itself, so a missing entry
//! shows up on screen instead of leaving a blank.

use std::collections::HashMap;

use async_trait::async_trait;
use forma_core::document::SchemaDocument;

pub type TranslationMap = HashMap<String, String>;

/// Supplies the stored translations of a tenant and locale.
#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn load_translations(&self, tenant_id: &str, locale: &str) -> anyhow::Result<TranslationMap>;
}

#[derive(Debug, Clone, Copy)]
pub struct BindOptions<'a> {
    pub tenant_id: &'a str,
    pub locale: &'a str,
    /// Caller-supplied translations. These always win over stored ones.
    pub translations: Option<&'a TranslationMap>,
    /// Load stored translations from the [`TranslationSource`].
    pub load_from_db: bool,
}

/// Merge stored and static translations, then apply them to a copy of `doc`.
///
/// A failing source is logged and treated as empty.
pub async fn bind(
    doc: &SchemaDocument,
    opts: BindOptions<'_>,
    source: Option<&dyn TranslationSource>,
) -> SchemaDocument {
    let mut merged = TranslationMap::new();

    if opts.load_from_db {
        if let Some(source) = source {
            match source.load_translations(opts.tenant_id, opts.locale).await {
                Ok(stored) => merged.extend(stored),
                Err(e) => tracing::warn!(
                    tenant = opts.tenant_id,
                    locale = opts.locale,
                    error = %e,
                    "failed to load translations, continuing without them"
                ),
            }
        }
    }
    if let Some(statics) = opts.translations {
        merged.extend(statics.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let mut bound = doc.clone();
    apply_translations(&mut bound, &merged);
    bound
}

/// Write the translation of every key into its literal slot.
pub fn apply_translations(doc: &mut SchemaDocument, translations: &TranslationMap) {
    let mut missing = 0_usize;
    let mut resolve = |key: &Option<String>, literal: &mut Option<String>| {
        if let Some(key) = key {
            let text = translations.get(key).cloned().unwrap_or_else(|| {
                missing += 1;
                key.clone()
            });
            *literal = Some(text);
        }
    };

    for field in doc.fields_mut() {
        let ui = &mut field.ui;
        resolve(&ui.label_key, &mut ui.label);
        resolve(&ui.placeholder_key, &mut ui.placeholder);
        resolve(&ui.description_key, &mut ui.description);
        resolve(&ui.tooltip_key, &mut ui.tooltip);

        for option in field.options.iter_mut().flatten() {
            resolve(&option.label_key, &mut option.label);
        }
        if let Some(validation) = field.validation.as_mut() {
            resolve(&validation.required_message_key, &mut validation.required_message);
            resolve(&validation.pattern_message_key, &mut validation.pattern_message);
        }
    }

    if let Some(submit) = doc.form.as_mut().and_then(|f| f.submit.as_mut()) {
        resolve(&submit.label_key, &mut submit.label);
    }
    for column in doc.table.iter_mut().flat_map(|t| t.columns.iter_mut()) {
        resolve(&column.label_key, &mut column.label);
    }
    for section in doc.detail.iter_mut().flat_map(|d| d.sections.iter_mut()) {
        resolve(&section.title_key, &mut section.title);
        for field in &mut section.fields {
            resolve(&field.label_key, &mut field.label);
        }
    }

    if missing > 0 {
        tracing::warn!(entity = %doc.entity, missing, "untranslated keys fell back to the key itself");
    }
}
