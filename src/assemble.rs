// SPDX-License-Identifier: Apache-2.0

//! Writes a package to disk.
//!
//! Every artifact is rendered before the first directory is created, so a
//! template problem never leaves a half-written package behind. I/O
//! failures after that point are reported as they happen; nothing already
//! written is rolled back.

use std::fs;

use log::{debug, info};

use crate::profile::{ArtifactSet, Content, Design, Profile};
use crate::render::Renderer;
use crate::{BuildConfig, IpgenError, Result};

/// Renders the package of `design` with `profile` and writes it out.
pub fn assemble(
    profile: &dyn Profile,
    design: &Design,
    config: &BuildConfig,
    renderer: &Renderer,
) -> Result<ArtifactSet> {
    let set = profile.artifacts(design, config, renderer)?;
    materialize(&set)?;

    info!("Synthesis settings");
    for (key, value) in config.settings() {
        info!("  {key} : {value}");
    }
    info!(
        "Packaged {} ({}) into {}",
        design.interface.name(),
        profile.family(),
        set.root.display()
    );
    Ok(set)
}

/// Creates the directory tree of `set` and writes every artifact.
/// Existing directories are reused and existing files overwritten.
pub fn materialize(set: &ArtifactSet) -> Result<()> {
    fs::create_dir_all(&set.root).map_err(|e| IpgenError::io(&set.root, e))?;
    for dir in &set.dirs {
        let path = set.root.join(dir);
        fs::create_dir_all(&path).map_err(|e| IpgenError::io(&path, e))?;
    }

    for artifact in &set.artifacts {
        let path = set.root.join(&artifact.path);
        match &artifact.content {
            Content::Text(text) => {
                fs::write(&path, text).map_err(|e| IpgenError::io(&path, e))?;
                debug!("Wrote {} ({} bytes)", path.display(), text.len());
            }
            Content::Copy(source) => {
                fs::copy(source, &path).map_err(|e| IpgenError::io(source, e))?;
                debug!("Copied {} to {}", source.display(), path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Layout;
    use std::path::PathBuf;

    fn set(root: PathBuf) -> ArtifactSet {
        let mut set = ArtifactSet::new(Layout {
            root,
            dirs: vec![PathBuf::from("a"), PathBuf::from("a/b")],
        });
        set.push_text("a/b/x.txt", "hello\n");
        set
    }

    #[test]
    fn writes_tree_and_reruns_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pkg");
        materialize(&set(root.clone())).unwrap();
        assert_eq!(
            fs::read_to_string(root.join("a/b/x.txt")).unwrap(),
            "hello\n"
        );

        fs::write(root.join("a/keep.txt"), "kept").unwrap();
        materialize(&set(root.clone())).unwrap();
        assert_eq!(fs::read_to_string(root.join("a/keep.txt")).unwrap(), "kept");
    }

    #[test]
    fn missing_copy_source_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = set(dir.path().to_path_buf());
        let missing = dir.path().join("nope.img");
        set.push("a/mem.img", Content::Copy(missing.clone()));
        match materialize(&set) {
            Err(IpgenError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }
}
