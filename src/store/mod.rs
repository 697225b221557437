//! Style configuration store.
//!
//! [`StyleStore`] owns the current [`StyleConfiguration`] plus editor
//! preferences, hydrates them once from [`Storage`] when opened, and writes
//! every change straight back. Updates are validated before they are
//! committed: a rejected update leaves the state exactly as it was.
//!
//! # Examples
//!
//! ```
//! use lazyqr::models::{ColorMode, StyleSection};
//! use lazyqr::storage::MemoryStorage;
//! use lazyqr::store::StyleStore;
//!
//! let mut store = StyleStore::open(MemoryStorage::new());
//! store.set_color_mode(ColorMode::Single);
//! assert!(store.config().dots_options.fill.gradient.is_none());
//! assert_eq!(store.color_mode(StyleSection::Dots), ColorMode::Single);
//! ```

mod state;

pub use state::{ColorModes, StylePreferences, StyleState};

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::constants::{storage_keys, CONFIG_EXPORT_FILENAME};
use crate::export::FileSaver;
use crate::models::{
    ColorMode, DotsPatch, DownloadFormat, ErrorCorrectionLevel, Frame, Gradient, GradientType,
    RgbColor, SectionPatch, StyleConfiguration, StylePatch, StyleSection,
};
use crate::storage::{load_from_storage, save_to_storage, Storage};
use state::StoredColorModes;

/// Style state bound to a storage backend.
#[derive(Debug)]
pub struct StyleStore<S: Storage> {
    storage: S,
    state: StyleState,
}

impl<S: Storage> StyleStore<S> {
    /// Opens the store, hydrating state from `storage`.
    ///
    /// Missing, unreadable or invalid values fall back to defaults; nothing
    /// here fails.
    pub fn open(storage: S) -> Self {
        let mut config: StyleConfiguration = load_from_storage(
            &storage,
            storage_keys::CONFIG,
            StyleConfiguration::default(),
        );
        if let Err(e) = config.validate() {
            tracing::warn!("Stored style configuration is invalid, using defaults: {:#}", e);
            config = StyleConfiguration::default();
        }

        let defaults = StylePreferences::default();
        let color_modes: StoredColorModes = load_from_storage(
            &storage,
            storage_keys::COLOR_TYPE,
            StoredColorModes::PerSection(defaults.color_modes),
        );
        let preferences = StylePreferences {
            download_format: load_from_storage(
                &storage,
                storage_keys::DOWNLOAD_FORMAT,
                defaults.download_format,
            ),
            color_modes: color_modes.into(),
            gradient_type: load_from_storage(
                &storage,
                storage_keys::GRADIENT_TYPE,
                defaults.gradient_type,
            ),
            active_accordion: load_from_storage(
                &storage,
                storage_keys::ACCORDION_STATE,
                defaults.active_accordion,
            ),
            error_correction_level: load_from_storage(
                &storage,
                storage_keys::ERROR_CORRECTION_LEVEL,
                config.error_correction_level,
            ),
        };

        tracing::debug!("Style store hydrated");
        Self {
            storage,
            state: StyleState {
                config,
                preferences,
            },
        }
    }

    /// Backing storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ---------------------------------------------------------------
    // Selectors
    // ---------------------------------------------------------------

    /// Full state.
    pub fn state(&self) -> &StyleState {
        &self.state
    }

    /// Stored configuration.
    pub fn config(&self) -> &StyleConfiguration {
        &self.state.config
    }

    /// Editor preferences.
    pub fn preferences(&self) -> &StylePreferences {
        &self.state.preferences
    }

    /// Preferred download format.
    pub fn download_format(&self) -> DownloadFormat {
        self.state.preferences.download_format
    }

    /// Color-input mode of a section.
    pub fn color_mode(&self, section: StyleSection) -> ColorMode {
        self.state.preferences.color_modes.get(section)
    }

    /// Gradient type used for synthesized gradients.
    pub fn gradient_type(&self) -> GradientType {
        self.state.preferences.gradient_type
    }

    /// Expanded settings panel.
    pub fn active_accordion(&self) -> &str {
        &self.state.preferences.active_accordion
    }

    /// Error-correction level used for rendering.
    pub fn error_correction_level(&self) -> ErrorCorrectionLevel {
        self.state.preferences.error_correction_level
    }

    /// Configuration handed to the renderer.
    ///
    /// The error-correction level comes from the preference and gradients
    /// are kept only for sections in gradient mode. In gradient mode the
    /// module gradient takes the preferred gradient type, with the stock
    /// stops when none are stored.
    pub fn render_config(&self) -> StyleConfiguration {
        let mut config = self.state.config.clone();
        config.error_correction_level = self.state.preferences.error_correction_level;
        for section in StyleSection::ALL {
            if self.color_mode(*section) == ColorMode::Single {
                config.fill_mut(*section).gradient = None;
            }
        }
        if self.color_mode(StyleSection::Dots) == ColorMode::Gradient {
            let dots = config.fill_mut(StyleSection::Dots);
            dots.gradient
                .get_or_insert_with(Gradient::default_module)
                .gradient_type = self.state.preferences.gradient_type;
        }
        config
    }

    // ---------------------------------------------------------------
    // Configuration updates
    // ---------------------------------------------------------------

    /// Shallow-merges `patch` into the configuration.
    pub fn update_config(&mut self, patch: StylePatch) -> Result<()> {
        let level = patch.error_correction_level;
        let touched: Vec<StyleSection> = [
            (StyleSection::Dots, patch.dots_options.is_some()),
            (StyleSection::CornersSquare, patch.corners_square_options.is_some()),
            (StyleSection::CornersDot, patch.corners_dot_options.is_some()),
            (StyleSection::Background, patch.background_options.is_some()),
        ]
        .into_iter()
        .filter_map(|(section, present)| present.then_some(section))
        .collect();

        self.commit(|config| {
            patch.apply_to(config);
            Ok(())
        })?;

        for section in touched {
            self.sync_color_mode(section);
        }
        if let Some(level) = level {
            self.state.preferences.error_correction_level = level;
            self.persist_error_correction_level();
        }
        Ok(())
    }

    /// Merges `patch` into the module options.
    pub fn update_module_options(&mut self, patch: DotsPatch) -> Result<()> {
        let gradient_changed = patch.gradient.is_some();
        self.commit(|config| {
            patch.apply_to(&mut config.dots_options);
            Ok(())
        })?;
        if gradient_changed {
            self.sync_color_mode(StyleSection::Dots);
        }
        Ok(())
    }

    /// Merges `patch` into one section's colors.
    pub fn update_section_options(
        &mut self,
        section: StyleSection,
        patch: SectionPatch,
    ) -> Result<()> {
        let gradient_changed = patch.gradient.is_some();
        self.commit(|config| {
            patch.apply_to(config.fill_mut(section));
            Ok(())
        })?;
        if gradient_changed {
            self.sync_color_mode(section);
        }
        Ok(())
    }

    /// Replaces the color of stop `index` in the module gradient.
    ///
    /// Does nothing when there is no gradient or `index` is out of range.
    pub fn update_gradient_color_stop(&mut self, index: usize, color: &str) -> Result<()> {
        self.update_section_gradient_stop(StyleSection::Dots, index, color)
    }

    /// Replaces the color of stop `index` in a section's gradient.
    ///
    /// Does nothing when there is no gradient or `index` is out of range.
    pub fn update_section_gradient_stop(
        &mut self,
        section: StyleSection,
        index: usize,
        color: &str,
    ) -> Result<()> {
        RgbColor::from_hex(color).context(format!("Invalid gradient stop color '{color}'"))?;

        let exists = self
            .state
            .config
            .fill(section)
            .gradient
            .as_ref()
            .is_some_and(|g| index < g.color_stops.len());
        if !exists {
            tracing::debug!("No {} gradient stop {}, ignoring", section, index);
            return Ok(());
        }

        self.commit(|config| {
            if let Some(stop) = config
                .fill_mut(section)
                .gradient
                .as_mut()
                .and_then(|g| g.color_stops.get_mut(index))
            {
                stop.color = color.to_string();
            }
            Ok(())
        })
    }

    /// Switches the module color mode.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.set_section_color_mode(StyleSection::Dots, mode);
    }

    /// Switches a section between a flat color and a gradient.
    ///
    /// Switching to gradient synthesizes a two-stop gradient from the flat
    /// color when none exists. Switching to single drops the gradient, so a
    /// later switch back starts from a fresh gradient.
    pub fn set_section_color_mode(&mut self, section: StyleSection, mode: ColorMode) {
        let gradient_type = self.state.preferences.gradient_type;
        let fill = self.state.config.fill_mut(section);
        match mode {
            ColorMode::Gradient => {
                if fill.gradient.is_none() {
                    fill.gradient = Some(Gradient::seeded(&fill.color, gradient_type));
                }
            }
            ColorMode::Single => fill.gradient = None,
        }

        self.state.preferences.color_modes.set(section, mode);
        self.persist_config();
        self.persist_color_modes();
    }

    /// Sets the module gradient type and remembers it for future gradients.
    pub fn set_gradient_type(&mut self, gradient_type: GradientType) {
        self.state.preferences.gradient_type = gradient_type;
        if let Some(gradient) = self.state.config.dots_options.fill.gradient.as_mut() {
            gradient.gradient_type = gradient_type;
            self.persist_config();
        }
        save_to_storage(&self.storage, storage_keys::GRADIENT_TYPE, &gradient_type);
    }

    /// Sets the module gradient rotation in degrees. No-op without a gradient.
    pub fn set_gradient_rotation(&mut self, degrees: f64) -> Result<()> {
        if self.state.config.dots_options.fill.gradient.is_none() {
            return Ok(());
        }
        self.commit(|config| {
            if let Some(gradient) = config.dots_options.fill.gradient.as_mut() {
                gradient.rotation = degrees;
            }
            Ok(())
        })
    }

    /// Sets the error-correction level in both the preference and the configuration.
    pub fn set_error_correction_level(&mut self, level: ErrorCorrectionLevel) {
        self.state.preferences.error_correction_level = level;
        self.state.config.error_correction_level = level;
        self.persist_config();
        self.persist_error_correction_level();
    }

    /// Sets the preferred download format.
    pub fn set_download_format(&mut self, format: DownloadFormat) {
        self.state.preferences.download_format = format;
        save_to_storage(&self.storage, storage_keys::DOWNLOAD_FORMAT, &format);
    }

    /// Remembers the expanded settings panel.
    pub fn set_active_accordion(&mut self, panel: impl Into<String>) {
        self.state.preferences.active_accordion = panel.into();
        save_to_storage(
            &self.storage,
            storage_keys::ACCORDION_STATE,
            &self.state.preferences.active_accordion,
        );
    }

    /// Embeds a logo (data URI or http(s) URL).
    pub fn set_logo(&mut self, source: impl Into<String>) -> Result<()> {
        let source = source.into();
        self.commit(|config| {
            config.image = Some(source);
            Ok(())
        })
    }

    /// Removes the logo.
    pub fn clear_logo(&mut self) {
        self.state.config.image = None;
        self.persist_config();
    }

    /// Replaces the frame decoration.
    pub fn set_frame(&mut self, frame: Frame) -> Result<()> {
        self.commit(|config| {
            config.frame = frame;
            Ok(())
        })
    }

    /// Restores the stock configuration and preferences and writes them out.
    pub fn reset_to_defaults(&mut self) {
        self.state = StyleState::default();
        tracing::info!("Style configuration reset to defaults");
        self.persist_all();
    }

    // ---------------------------------------------------------------
    // Import / export
    // ---------------------------------------------------------------

    /// Replaces the configuration with one previously exported as JSON.
    pub fn import_configuration(&mut self, json: &str) -> Result<()> {
        let config: StyleConfiguration =
            serde_json::from_str(json).context("Failed to parse style configuration JSON")?;
        config
            .validate()
            .context("Imported style configuration is invalid")?;

        self.state.preferences.color_modes = state::ColorModes::from_config(&config);
        self.state.preferences.error_correction_level = config.error_correction_level;
        self.state.config = config;
        self.persist_all();
        Ok(())
    }

    /// Current configuration as pretty-printed JSON.
    pub fn export_configuration_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.state.config)
            .context("Failed to serialize style configuration")
    }

    /// Saves the configuration as `qr-config.json` through `saver`.
    pub fn export_configuration_as_file(&self, saver: &dyn FileSaver) -> Result<PathBuf> {
        let json = self.export_configuration_json()?;
        saver.save(CONFIG_EXPORT_FILENAME, json.as_bytes())
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    /// Applies `change` to a copy of the configuration, validates it and commits.
    fn commit<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut StyleConfiguration) -> Result<()>,
    {
        let mut candidate = self.state.config.clone();
        change(&mut candidate)?;
        candidate
            .validate()
            .context("Style update rejected")?;

        self.state.config = candidate;
        self.persist_config();
        Ok(())
    }

    /// Aligns a section's color mode with whether it now has a gradient.
    fn sync_color_mode(&mut self, section: StyleSection) {
        let mode = if self.state.config.fill(section).gradient.is_some() {
            ColorMode::Gradient
        } else {
            ColorMode::Single
        };
        if self.state.preferences.color_modes.get(section) != mode {
            self.state.preferences.color_modes.set(section, mode);
            self.persist_color_modes();
        }
    }

    fn persist_config(&self) {
        save_to_storage(&self.storage, storage_keys::CONFIG, &self.state.config);
    }

    fn persist_color_modes(&self) {
        save_to_storage(
            &self.storage,
            storage_keys::COLOR_TYPE,
            &self.state.preferences.color_modes,
        );
    }

    fn persist_error_correction_level(&self) {
        save_to_storage(
            &self.storage,
            storage_keys::ERROR_CORRECTION_LEVEL,
            &self.state.preferences.error_correction_level,
        );
    }

    fn persist_all(&self) {
        let prefs = &self.state.preferences;
        self.persist_config();
        self.persist_color_modes();
        self.persist_error_correction_level();
        save_to_storage(&self.storage, storage_keys::GRADIENT_TYPE, &prefs.gradient_type);
        save_to_storage(&self.storage, storage_keys::DOWNLOAD_FORMAT, &prefs.download_format);
        save_to_storage(
            &self.storage,
            storage_keys::ACCORDION_STATE,
            &prefs.active_accordion,
        );
    }
}
