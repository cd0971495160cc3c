use crate::environment::EnvironmentMap;
use crate::error::AssetLoadFailure;
use crate::gltf::{GltfSource, Importer, parse_container};
use crate::progress::{LoadProgress, ProgressObserver};
use crate::scene::ModelScene;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const READ_CHUNK: usize = 64 * 1024;

/// Content-addressed id computed from an asset's source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut id = [0u8; 8];
        id.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(id))
    }
}

/// A successfully imported model.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub asset_id: AssetId,
    pub path: PathBuf,
    pub source: GltfSource,
    pub scene: ModelScene,
}

/// Read a whole file, reporting progress after every chunk.
async fn read_with_progress(
    path: &Path,
    observer: &mut impl ProgressObserver,
) -> Result<Vec<u8>, AssetLoadFailure> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AssetLoadFailure::io(path, e))?;
    let total = file.metadata().await.ok().map(|m| m.len());

    let mut data = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = file
            .read(&mut chunk)
            .await
            .map_err(|e| AssetLoadFailure::io(path, e))?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        observer.on_progress(LoadProgress {
            loaded: data.len() as u64,
            total,
        });
    }
    if data.is_empty() {
        observer.on_progress(LoadProgress { loaded: 0, total });
    }
    Ok(data)
}

/// Load a `.gltf` or `.glb` model.
///
/// External buffers are resolved relative to the model file. Embedded
/// `data:` URIs are not supported.
pub async fn load_model(
    path: impl AsRef<Path>,
    observer: &mut impl ProgressObserver,
) -> Result<LoadedModel, AssetLoadFailure> {
    let path = path.as_ref();
    let bytes = read_with_progress(path, observer).await?;
    let asset_id = AssetId::of(&bytes);
    let container = parse_container(&bytes)?;

    let base = path.parent().unwrap_or(Path::new("."));
    let mut bin = container.bin;
    let mut buffers = Vec::with_capacity(container.document.buffers.len());
    for (i, buffer) in container.document.buffers.iter().enumerate() {
        let data = match buffer.uri.as_deref() {
            None => bin.take().ok_or_else(|| {
                AssetLoadFailure::format(format!("buffer {i} has no uri and no GLB BIN chunk"))
            })?,
            Some(uri) if uri.starts_with("data:") => {
                return Err(AssetLoadFailure::Unsupported(
                    "embedded data: buffer URIs".into(),
                ));
            }
            Some(uri) => {
                let buffer_path = base.join(uri);
                tokio::fs::read(&buffer_path)
                    .await
                    .map_err(|e| AssetLoadFailure::io(buffer_path, e))?
            }
        };
        if data.len() < buffer.byte_length {
            return Err(AssetLoadFailure::format(format!(
                "buffer {i} has {} bytes, declared {}",
                data.len(),
                buffer.byte_length
            )));
        }
        buffers.push(data);
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".into());
    let scene = Importer::new(&container.document, &buffers).build_scene(&name)?;

    tracing::info!(
        path = %path.display(),
        nodes = scene.node_count(),
        primitives = scene.primitive_count(),
        vertices = scene.vertex_count(),
        "model loaded"
    );

    Ok(LoadedModel {
        asset_id,
        path: path.to_path_buf(),
        source: container.source,
        scene,
    })
}

/// Load a Radiance `.hdr` environment map.
pub async fn load_environment(
    path: impl AsRef<Path>,
    observer: &mut impl ProgressObserver,
) -> Result<EnvironmentMap, AssetLoadFailure> {
    let path = path.as_ref();
    let bytes = read_with_progress(path, observer).await?;
    let env = EnvironmentMap::decode_hdr(&bytes)?;
    tracing::info!(
        path = %path.display(),
        width = env.width,
        height = env.height,
        "environment map loaded"
    );
    Ok(env)
}
