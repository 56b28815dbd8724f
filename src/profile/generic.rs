// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_GENERIC_OUTPUT;
use crate::profile::{base_context, synthesize, ArtifactSet, Design, Layout, Profile};
use crate::render::{Renderer, TemplateName};
use crate::{BuildConfig, Classifier, InterfaceFamily, Result};

/// Unwrapped bundle: a single HDL file holding the wrapper followed by the
/// user logic. No descriptors, no test scaffolding.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericProfile;

impl Profile for GenericProfile {
    fn family(&self) -> InterfaceFamily {
        InterfaceFamily::Generic
    }

    fn select_templates(&self) -> &'static [TemplateName] {
        &[TemplateName::NodeGeneral]
    }

    fn layout(&self, output_root: &Path, _module: &str) -> Layout {
        Layout {
            root: output_root.to_path_buf(),
            dirs: Vec::new(),
        }
    }

    fn artifacts(
        &self,
        design: &Design,
        config: &BuildConfig,
        renderer: &Renderer,
    ) -> Result<ArtifactSet> {
        let intf = &design.interface;
        let output = config.generic_output();
        let root = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = output
            .file_name()
            .map_or_else(|| PathBuf::from(DEFAULT_GENERIC_OUTPUT), PathBuf::from);

        let classification = Classifier::new(self.family()).classify(intf);
        let ctx = base_context(intf, &classification, config);
        let (synthesized, common) = synthesize(
            renderer,
            TemplateName::NodeGeneral,
            &ctx,
            &design.user_hdl,
            &[],
        )?;

        let mut set = ArtifactSet::new(self.layout(&root, intf.name()));
        set.push_text(file_name, synthesized + &common);
        Ok(set)
    }
}
