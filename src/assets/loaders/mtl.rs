use std::path::Path;
use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::assets::io::{AssetSource, parent_dir, resolve_relative};
use crate::assets::storage::TextureLoader;
use crate::errors::{Result, ViewerError};
use crate::resources::Material;

/// Materials of one MTL file, keyed by `newmtl` name.
pub type MaterialLibrary = FxHashMap<String, Arc<Material>>;

/// MTL parser.
///
/// Honors `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`, `map_Kd`, `map_Ns` and the
/// normal-map spellings `map_Bump`, `bump` and `norm`. Texture paths are
/// resolved against the MTL file's own directory and registered with the
/// texture loader immediately. Other records are ignored.
pub struct MtlLoader<'a> {
    textures: &'a mut dyn TextureLoader,
}

impl<'a> MtlLoader<'a> {
    pub fn new(textures: &'a mut dyn TextureLoader) -> Self {
        Self { textures }
    }

    pub fn load(&mut self, source: &dyn AssetSource, path: &Path) -> Result<MaterialLibrary> {
        let text = source.read_to_string(path)?;
        let library = self.parse(&text, &parent_dir(path))?;
        log::debug!("Loaded MTL {}: {} materials", path.display(), library.len());
        Ok(library)
    }

    pub fn parse(&mut self, text: &str, base_dir: &Path) -> Result<MaterialLibrary> {
        let mut materials: Vec<Material> = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let Some((&keyword, args)) = tokens.split_first() else {
                continue;
            };

            if keyword == "newmtl" {
                let name = args.first().copied().unwrap_or_default();
                materials.push(Material::new(name));
                continue;
            }

            if !is_material_property(keyword) {
                continue;
            }

            let Some(current) = materials.last_mut() else {
                log::warn!("MTL line {line_no}: '{keyword}' before any newmtl; ignored");
                continue;
            };

            match keyword {
                "Ka" => current.ambient = parse_color(args, line_no)?,
                "Kd" => current.diffuse = parse_color(args, line_no)?,
                "Ks" => current.specular = parse_color(args, line_no)?,
                "Ns" => current.shininess = parse_scalar(args.first().copied(), line_no)?,
                "map_Kd" => {
                    if let Some(file) = args.first() {
                        let path = resolve_relative(base_dir, file);
                        current.map = Some(self.textures.load_texture(&path));
                    }
                }
                "map_Ns" => {
                    if let Some(file) = args.first() {
                        let path = resolve_relative(base_dir, file);
                        current.specular_map = Some(self.textures.load_texture(&path));
                    }
                }
                // Bump maps may carry options (`-bm 0.5`) ahead of the file name.
                "map_Bump" | "bump" | "norm" => {
                    if let Some(file) = args.last() {
                        let path = resolve_relative(base_dir, file);
                        current.normal_map = Some(self.textures.load_texture(&path));
                    }
                }
                _ => {}
            }
        }

        // A repeated newmtl name replaces the earlier definition.
        Ok(materials
            .into_iter()
            .map(|m| (m.name.clone(), Arc::new(m)))
            .collect())
    }
}

fn is_material_property(keyword: &str) -> bool {
    matches!(
        keyword,
        "Ka" | "Kd" | "Ks" | "Ns" | "map_Kd" | "map_Ns" | "map_Bump" | "bump" | "norm"
    )
}

pub(crate) fn parse_scalar(token: Option<&str>, line: usize) -> Result<f32> {
    let token = token.unwrap_or_default();
    token.parse::<f32>().map_err(|_| ViewerError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_color(args: &[&str], line: usize) -> Result<Vec3> {
    Ok(Vec3::new(
        parse_scalar(args.first().copied(), line)?,
        parse_scalar(args.get(1).copied(), line)?,
        parse_scalar(args.get(2).copied(), line)?,
    ))
}
