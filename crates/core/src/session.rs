//! Per-request engine context

use crate::{
    amend::AmendService,
    bsp::BspProject,
    cache::TargetListCache,
    config::Config,
    error::{Error, Result},
    interfaces::{Amender, ProjectRoot, TargetLister},
    services::{FastpassAmender, FsProjectRoot, PantsCli},
    validator::TargetSpecValidator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Overrides build root discovery
pub const PANTS_ROOT_ENV: &str = "PANTS_ROOT";

/// Everything one operation against a Pants workspace needs
///
/// A session is owned by whoever started the operation and is passed
/// explicitly; nothing is registered globally.
pub struct Session {
    root: Arc<dyn ProjectRoot>,
    config: Config,
    lister: Arc<dyn TargetLister>,
    bsp: Option<BspProject>,
    amend: Option<AmendService>,
}

impl Session {
    pub fn new(root: Arc<dyn ProjectRoot>, lister: Arc<dyn TargetLister>) -> Self {
        Self {
            root,
            config: Config::default(),
            lister,
            bsp: None,
            amend: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_bsp_project(mut self, bsp: BspProject) -> Self {
        self.bsp = Some(bsp);
        self
    }

    pub fn with_amender(mut self, amender: Arc<dyn Amender>) -> Self {
        self.amend = Some(AmendService::new(amender));
        self
    }

    /// Session for the workspace containing `start`.
    ///
    /// The build root is `$PANTS_ROOT` when set, otherwise the nearest
    /// directory with a Pants launcher. Configuration is loaded from
    /// `start` upwards. Amending is available when a BSP project is
    /// configured and has been imported.
    pub fn open(start: &Path) -> Result<Self> {
        let root = match std::env::var_os(PANTS_ROOT_ENV) {
            Some(root) => {
                debug!("Using {} from {}", PathBuf::from(&root).display(), PANTS_ROOT_ENV);
                FsProjectRoot::new(root)
            }
            None => FsProjectRoot::discover(start)?,
        };
        let config = Config::load(start)?;
        info!("Pants build root: {}", root.root().display());

        let lister = PantsCli::new(root.root(), config.pants.clone().unwrap_or_default());
        let bsp = config
            .bsp_root
            .as_ref()
            .map(|bsp_root| root.root().join(bsp_root))
            .and_then(|bsp_root| BspProject::detect(&bsp_root, root.root()));

        let mut session = Self::new(Arc::new(root), Arc::new(lister)).with_config(config);
        if let Some(bsp) = bsp {
            let amender = FastpassAmender::new(
                bsp.clone(),
                session.config.fastpass.clone().unwrap_or_default(),
            );
            session = session.with_bsp_project(bsp).with_amender(Arc::new(amender));
        }
        Ok(session)
    }

    pub fn root(&self) -> &Arc<dyn ProjectRoot> {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bsp_project(&self) -> Option<&BspProject> {
        self.bsp.as_ref()
    }

    /// A cache with no entries; every call gets its own snapshot
    pub fn fresh_cache(&self) -> Arc<TargetListCache> {
        Arc::new(TargetListCache::new(
            Arc::clone(&self.root),
            Arc::clone(&self.lister),
        ))
    }

    /// Validator over a fresh cache
    pub fn validator(&self) -> TargetSpecValidator {
        TargetSpecValidator::new(self.fresh_cache())
    }

    pub fn amend_service(&self) -> Result<&AmendService> {
        self.amend.as_ref().ok_or_else(|| {
            Error::ConfigError(
                "No imported BSP project; set `bsp_root` in .pantsbridge.json".to_string(),
            )
        })
    }
}
