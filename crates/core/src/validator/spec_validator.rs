use crate::{
    address::{AddressKind, TargetAddress},
    cache::TargetListCache,
    error::{Error, Result},
    interfaces::ProjectRoot,
};
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Concrete targets a spec resolved to
pub type Expansion = BTreeSet<TargetAddress>;

/// Each requested address with its expansion
pub type Preview = BTreeMap<TargetAddress, Expansion>;

/// Validates raw spec strings against the build tool's declared targets
///
/// All lookups go through one [`TargetListCache`], so every spec validated
/// by the same validator sees the same snapshot and specs in the same
/// directory share a single `list` query.
pub struct TargetSpecValidator {
    root: Arc<dyn ProjectRoot>,
    cache: Arc<TargetListCache>,
}

impl TargetSpecValidator {
    pub fn new(cache: Arc<TargetListCache>) -> Self {
        Self {
            root: Arc::clone(cache.root()),
            cache,
        }
    }

    pub fn cache(&self) -> &TargetListCache {
        &self.cache
    }

    /// Parse, check the directory, fetch its targets and expand.
    pub async fn validate(&self, spec: &str) -> Result<(TargetAddress, Expansion)> {
        let spec = spec.trim();
        let address = TargetAddress::parse(spec).ok_or_else(|| Error::MalformedAddress {
            spec: spec.to_string(),
        })?;

        if !self.root.has_directory(address.path()) {
            return Err(Error::UnknownDirectory {
                spec: spec.to_string(),
                path: self.root.resolve(address.path()),
            });
        }

        let declared = self.cache.get_targets(address.path()).await?;
        let expansion = expand(&address, &declared, spec)?;
        debug!("'{}' expands to {} targets", spec, expansion.len());
        Ok((address, expansion))
    }

    /// Validate every distinct spec concurrently, keeping each outcome.
    pub async fn validate_each<I, S>(
        &self,
        specs: I,
    ) -> BTreeMap<String, Result<(TargetAddress, Expansion)>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let specs = distinct_specs(specs);
        let outcomes = join_all(specs.iter().map(|spec| self.validate(spec))).await;
        specs.into_iter().zip(outcomes).collect()
    }

    /// Expand every distinct spec, or fail with the first failing spec (in
    /// sorted spec order).
    pub async fn preview<I, S>(&self, specs: I) -> Result<Preview>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut preview = Preview::new();
        for (_, outcome) in self.validate_each(specs).await {
            let (address, expansion) = outcome?;
            preview.entry(address).or_insert(expansion);
        }
        Ok(preview)
    }
}

/// Resolve `address` against the targets declared under its directory.
pub fn expand(address: &TargetAddress, declared: &[TargetAddress], spec: &str) -> Result<Expansion> {
    match address.kind() {
        AddressKind::SingleTarget => {
            if declared.iter().any(|target| target.matches_single(address)) {
                Ok(BTreeSet::from([address.clone()]))
            } else {
                Err(Error::UnknownTarget {
                    spec: spec.to_string(),
                })
            }
        }
        AddressKind::AllInDirShallow => Ok(declared
            .iter()
            .filter(|target| target.path() == address.path())
            .cloned()
            .collect()),
        AddressKind::AllInDirDeep => Ok(declared.iter().cloned().collect()),
    }
}

fn distinct_specs<I, S>(specs: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    specs
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
