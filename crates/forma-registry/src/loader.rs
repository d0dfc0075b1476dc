//! The schema loading pipeline.
//!
//! `load_schema` runs resolve → validate → migrate → bind → version gate and
//! caches the result per `(tenant, entity, type, locale, client version)`.
//! Every failure maps to one [`SchemaLoadErrorCode`](crate::SchemaLoadErrorCode).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use forma_core::document::SchemaDocument;
use forma_core::entry::RegistryEntry;
use forma_core::enums::{SchemaSource, SchemaType};
use forma_core::scope::RenderScope;
use forma_core::version::is_client_compatible;
use forma_schema::{BindOptions, MigrationSet, SchemaError, SchemaValidator, TranslationMap, TranslationSource, bind};
use semver::Version;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::SchemaLoadError;
use crate::resolver::{ResolveOptions, Resolved, resolve};

/// Supplies the active registry rows of an entity for a tenant.
///
/// Rows are expected to be filtered to `status = active` and pinned per
/// tenant already.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn get_active_schemas(&self, entity: &str, tenant_id: &str) -> anyhow::Result<Vec<RegistryEntry>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub tenant_id: String,
    pub entity: String,
    pub schema_type: SchemaType,
    pub locale: String,
    pub client_version: Version,
    /// Industry of the tenant; `None` resolves common entries only.
    pub industry_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedSchema {
    pub schema: SchemaDocument,
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub cache_enabled: bool,
    /// Fetch stored translations through the [`TranslationSource`].
    pub load_translations: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            load_translations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    tenant_id: String,
    entity: String,
    schema_type: SchemaType,
    locale: String,
    client_version: Version,
    industry_type: Option<String>,
}

impl From<&LoadRequest> for CacheKey {
    fn from(req: &LoadRequest) -> Self {
        Self {
            tenant_id: req.tenant_id.clone(),
            entity: req.entity.clone(),
            schema_type: req.schema_type,
            locale: req.locale.clone(),
            client_version: req.client_version.clone(),
            industry_type: req.industry_type.clone(),
        }
    }
}

pub struct SchemaLoader {
    registry: Arc<dyn RegistrySource>,
    translations: Option<Arc<dyn TranslationSource>>,
    static_translations: Option<TranslationMap>,
    validator: SchemaValidator,
    migrations: MigrationSet,
    migration_target: Option<Version>,
    fallbacks: HashMap<(String, SchemaType), SchemaDocument>,
    options: LoaderOptions,
    cache: Mutex<HashMap<CacheKey, SchemaDocument>>,
}

impl SchemaLoader {
    /// # Errors
    ///
    /// Returns [`SchemaError::Generation`] if the document validator cannot
    /// be compiled.
    pub fn new(registry: Arc<dyn RegistrySource>) -> Result<Self, SchemaError> {
        Ok(Self {
            registry,
            translations: None,
            static_translations: None,
            validator: SchemaValidator::new()?,
            migrations: MigrationSet::new(),
            migration_target: None,
            fallbacks: HashMap::new(),
            options: LoaderOptions::default(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_translation_source(mut self, source: Arc<dyn TranslationSource>) -> Self {
        self.translations = Some(source);
        self
    }

    /// Caller-supplied translations; these override stored ones.
    #[must_use]
    pub fn with_static_translations(mut self, translations: TranslationMap) -> Self {
        self.static_translations = Some(translations);
        self
    }

    /// Migrate resolved documents older than `target` with `migrations`.
    #[must_use]
    pub fn with_migrations(mut self, migrations: MigrationSet, target: Version) -> Self {
        self.migrations = migrations;
        self.migration_target = Some(target);
        self
    }

    /// Register a local fallback document for its entity and type.
    #[must_use]
    pub fn with_fallback(mut self, doc: SchemaDocument) -> Self {
        self.fallbacks.insert((doc.entity.clone(), doc.schema_type), doc);
        self
    }

    /// Load a ready-to-render document.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaLoadError`] whose [`code`](SchemaLoadError::code)
    /// is one of the five load failure codes.
    pub async fn load_schema(&self, req: &LoadRequest) -> Result<LoadedSchema, SchemaLoadError> {
        let key = CacheKey::from(req);
        if self.options.cache_enabled {
            if let Some(schema) = self.cache.lock().await.get(&key).cloned() {
                tracing::debug!(tenant = %req.tenant_id, entity = %req.entity, "schema cache hit");
                return Ok(LoadedSchema {
                    schema,
                    from_cache: true,
                });
            }
        }

        let schema = self.run_pipeline(req).await?;

        if self.options.cache_enabled {
            self.cache.lock().await.insert(key, schema.clone());
        }
        Ok(LoadedSchema {
            schema,
            from_cache: false,
        })
    }

    /// [`load_schema`](Self::load_schema), discarding the result if `scope`
    /// is unmounted before it finishes.
    ///
    /// # Errors
    ///
    /// Same as [`load_schema`](Self::load_schema).
    pub async fn load_schema_in_scope(
        &self,
        req: &LoadRequest,
        scope: &RenderScope,
    ) -> Result<Option<LoadedSchema>, SchemaLoadError> {
        scope.guard(self.load_schema(req)).await.transpose()
    }

    /// Drop every cached document of `entity` for `tenant_id`.
    pub async fn invalidate(&self, tenant_id: &str, entity: &str) {
        let mut cache = self.cache.lock().await;
        let before = cache.len();
        cache.retain(|key, _| !(key.tenant_id == tenant_id && key.entity == entity));
        tracing::debug!(tenant = tenant_id, entity, dropped = before - cache.len(), "schema cache invalidated");
    }

    async fn run_pipeline(&self, req: &LoadRequest) -> Result<SchemaDocument, SchemaLoadError> {
        let entries = self
            .registry
            .get_active_schemas(&req.entity, &req.tenant_id)
            .await
            .map_err(|source| SchemaLoadError::Registry {
                entity: req.entity.clone(),
                source,
            })?;

        let fallback = self.fallbacks.get(&(req.entity.clone(), req.schema_type));
        let opts = ResolveOptions {
            industry_type: req.industry_type.as_deref(),
            schema_type: Some(req.schema_type),
            client_version: &req.client_version,
            fallback,
        };
        let not_found = || SchemaLoadError::NotFound {
            entity: req.entity.clone(),
            schema_type: req.schema_type,
        };

        let (mut doc, source) = match resolve(&req.entity, &entries, opts)?.ok_or_else(not_found)? {
            Resolved::Entry(entry) => (self.decode(entry)?, SchemaSource::Registry),
            Resolved::Fallback(doc) => {
                self.checked(doc, SchemaSource::LocalFallback)?;
                (doc.clone(), SchemaSource::LocalFallback)
            }
        };
        if doc.schema_type != req.schema_type {
            return Err(not_found());
        }

        if let Some(target) = self.migration_target.as_ref().filter(|t| doc.version < **t) {
            doc = self.migrations.migrate(&doc, target).map_err(|e| invalid(&doc, e))?;
            self.checked(&doc, source)?;
        }

        let bind_opts = BindOptions {
            tenant_id: &req.tenant_id,
            locale: &req.locale,
            translations: self.static_translations.as_ref(),
            load_from_db: self.options.load_translations,
        };
        let doc = bind(&doc, bind_opts, self.translations.as_deref()).await;

        if !is_client_compatible(&req.client_version, &doc.min_supported_client) {
            return Err(SchemaLoadError::ClientUpdateRequired {
                entity: doc.entity,
                client: req.client_version.clone(),
                required: doc.min_supported_client,
            });
        }
        Ok(doc)
    }

    fn decode(&self, entry: &RegistryEntry) -> Result<SchemaDocument, SchemaLoadError> {
        if entry.schema_json.is_null() {
            return Err(SchemaLoadError::FileMissing {
                entity: entry.entity.clone(),
                version: entry.version.clone(),
            });
        }
        self.validator
            .validate_value(&entry.schema_json, SchemaSource::Registry)
            .map_err(|e| match e {
                SchemaError::Corrupted(reason) => SchemaLoadError::Corrupted {
                    entity: entry.entity.clone(),
                    version: entry.version.clone(),
                    reason,
                },
                other => SchemaLoadError::ValidationFailed {
                    entity: entry.entity.clone(),
                    source: other,
                },
            })
    }

    fn checked(&self, doc: &SchemaDocument, source: SchemaSource) -> Result<(), SchemaLoadError> {
        self.validator.validate(doc, source).map_err(|e| invalid(doc, e))
    }
}

fn invalid(doc: &SchemaDocument, source: SchemaError) -> SchemaLoadError {
    SchemaLoadError::ValidationFailed {
        entity: doc.entity.clone(),
        source,
    }
}
