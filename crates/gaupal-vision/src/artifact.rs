//! Model artifact format and the loading fallback ladder.
//!
//! An artifact is a directory holding a `model` record (`.mpk`, `.bin` or
//! `.json` depending on the recorder), an optional `config.json` and an
//! optional `classes.json`. Loading never fails outright: when every strategy
//! is exhausted the service starts with freshly initialized weights and the
//! `degraded` flag set, so smoke deployments still come up.

use std::fmt;
use std::fs;
use std::path::Path;

use burn::{
    config::Config,
    module::Module,
    record::{
        BinFileRecorder, CompactRecorder, FullPrecisionSettings, NamedMpkFileRecorder,
        PrettyJsonFileRecorder,
    },
    tensor::backend::Backend,
};
use tracing::{debug, info, warn};

use gaupal_core::{Error, Result};

use crate::model::{ArchPreset, CattleClassifier, CattleClassifierConfig};

/// File recorder used for a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderKind {
    Compact,
    NamedMpk,
    Bin,
    PrettyJson,
}

impl RecorderKind {
    const ALL: [RecorderKind; 4] = [
        RecorderKind::Compact,
        RecorderKind::NamedMpk,
        RecorderKind::Bin,
        RecorderKind::PrettyJson,
    ];

    fn name(&self) -> &'static str {
        match self {
            RecorderKind::Compact => "compact",
            RecorderKind::NamedMpk => "named-mpk",
            RecorderKind::Bin => "bin",
            RecorderKind::PrettyJson => "pretty-json",
        }
    }
}

impl fmt::Display for RecorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the classifier weights were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Declared (or default) config, record loaded as-is
    Declared { recorder: RecorderKind },
    /// Config head resized to the catalog length in `classes.json`
    CatalogResized { recorder: RecorderKind },
    /// Architecture found by sweeping the preset configs
    Probed {
        preset: ArchPreset,
        recorder: RecorderKind,
    },
    /// Freshly initialized weights; predictions are not meaningful
    Degraded,
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Declared { recorder } => write!(f, "declared-config ({recorder})"),
            LoadStrategy::CatalogResized { recorder } => write!(f, "catalog-resized ({recorder})"),
            LoadStrategy::Probed { preset, recorder } => write!(f, "probed:{preset} ({recorder})"),
            LoadStrategy::Degraded => f.write_str("degraded"),
        }
    }
}

/// A classifier loaded from an artifact directory
pub struct LoadedClassifier<B: Backend> {
    pub model: CattleClassifier<B>,
    pub config: CattleClassifierConfig,
    pub class_names: Option<Vec<String>>,
    pub strategy: LoadStrategy,
    pub degraded: bool,
}

/// Save a model, its config and optionally its class names into an artifact
/// directory, using the compact recorder.
pub fn write_artifact<B: Backend>(
    model: CattleClassifier<B>,
    config: &CattleClassifierConfig,
    class_names: Option<&[String]>,
    dir: &Path,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    config.save(dir.join("config.json"))?;
    if let Some(names) = class_names {
        fs::write(dir.join("classes.json"), serde_json::to_string_pretty(&names)?)?;
    }
    model
        .save_file(dir.join("model"), &CompactRecorder::new())
        .map_err(|e| Error::Artifact(format!("failed to save model record: {e}")))?;
    Ok(())
}

/// Load a classifier from an artifact directory, degrading through the
/// fallback ladder instead of failing.
pub fn load_classifier<B: Backend>(
    dir: &Path,
    device: &B::Device,
    default_classes: usize,
) -> LoadedClassifier<B> {
    let class_names = read_class_names(dir);
    let declared = read_config(dir);

    let catalog_classes = class_names.as_ref().map(|n| n.len());
    let fallback_classes = catalog_classes.unwrap_or(default_classes);

    let base_config = declared
        .clone()
        .unwrap_or_else(|| ArchPreset::Standard.config(fallback_classes));

    // Strategy 1-2: declared (or default) config, sweeping the recorders.
    if let Some((model, recorder)) = try_recorders(&base_config, dir, device) {
        let strategy = LoadStrategy::Declared { recorder };
        info!("Model loaded from {:?} via {}", dir, strategy);
        return LoadedClassifier {
            model,
            config: base_config,
            class_names,
            strategy,
            degraded: false,
        };
    }

    // Strategy 3: the catalog disagrees with the config's class count;
    // resize the head and retry.
    if let Some(n) = catalog_classes {
        if n != base_config.num_classes {
            let mut resized = base_config.clone();
            resized.num_classes = n;
            if let Some((model, recorder)) = try_recorders(&resized, dir, device) {
                let strategy = LoadStrategy::CatalogResized { recorder };
                info!("Model loaded from {:?} via {}", dir, strategy);
                return LoadedClassifier {
                    model,
                    config: resized,
                    class_names,
                    strategy,
                    degraded: false,
                };
            }
        }
    }

    // Strategy 4: probe the preset architectures.
    for preset in ArchPreset::ALL {
        let config = preset.config(fallback_classes);
        if let Some((model, recorder)) = try_recorders(&config, dir, device) {
            let strategy = LoadStrategy::Probed { preset, recorder };
            info!("Model loaded from {:?} via {}", dir, strategy);
            return LoadedClassifier {
                model,
                config,
                class_names,
                strategy,
                degraded: false,
            };
        }
    }

    // Strategy 5: degraded fallback with fresh weights.
    warn!(
        "All load strategies failed for {:?}; starting with fresh weights. \
        Predictions will not be meaningful.",
        dir
    );
    let mut config = base_config;
    if let Some(n) = catalog_classes {
        config.num_classes = n;
    }
    let model = config.init::<B>(device);
    LoadedClassifier {
        model,
        config,
        class_names,
        strategy: LoadStrategy::Degraded,
        degraded: true,
    }
}

fn read_class_names(dir: &Path) -> Option<Vec<String>> {
    let path = dir.join("classes.json");
    let raw = fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(names) if !names.is_empty() => Some(names),
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring unreadable {:?}: {}", path, e);
            None
        }
    }
}

fn read_config(dir: &Path) -> Option<CattleClassifierConfig> {
    let path = dir.join("config.json");
    if !path.exists() {
        return None;
    }
    match CattleClassifierConfig::load(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring unreadable {:?}: {}", path, e);
            None
        }
    }
}

fn try_recorders<B: Backend>(
    config: &CattleClassifierConfig,
    dir: &Path,
    device: &B::Device,
) -> Option<(CattleClassifier<B>, RecorderKind)> {
    let path = dir.join("model");
    let expected_params = config.init::<B>(device).num_params();

    for kind in RecorderKind::ALL {
        let fresh = config.init::<B>(device);
        let result = match kind {
            RecorderKind::Compact => fresh.load_file(path.clone(), &CompactRecorder::new(), device),
            RecorderKind::NamedMpk => fresh.load_file(
                path.clone(),
                &NamedMpkFileRecorder::<FullPrecisionSettings>::new(),
                device,
            ),
            RecorderKind::Bin => fresh.load_file(
                path.clone(),
                &BinFileRecorder::<FullPrecisionSettings>::new(),
                device,
            ),
            RecorderKind::PrettyJson => fresh.load_file(
                path.clone(),
                &PrettyJsonFileRecorder::<FullPrecisionSettings>::new(),
                device,
            ),
        };

        match result {
            // A record with foreign tensor shapes can deserialize into the
            // right module structure; reject it by parameter count.
            Ok(model) if model.num_params() == expected_params => return Some((model, kind)),
            Ok(_) => debug!(
                "Recorder {} loaded a record that does not fit config {:?}",
                kind, config
            ),
            Err(e) => debug!("Recorder {} failed for {:?}: {}", kind, path, e),
        }
    }

    None
}
