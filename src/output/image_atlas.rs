use anyhow::Result;

use super::binary::{ByteReader, ByteWriter, bad};
use crate::atlas::{Atlas, TexCoords};
use crate::error::AtlasError;
use crate::packing::Rect;

pub const IMAGE_ATLAS_MAGIC: &[u8; 4] = b"NGAT";

/// One decoded image-atlas record
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// Name with the shared prefix already stripped
    pub name: String,
    pub rect: Rect,
    pub tex: TexCoords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImageAtlas {
    pub entries: Vec<ImageEntry>,
    pub png: Vec<u8>,
}

/// Byte length of the prefix shared by every name, cut back to just after
/// the last path separator. Zero when the shared part has no separator.
pub fn common_prefix_len<S: AsRef<str>>(names: &[S]) -> usize {
    let Some((first, rest)) = names.split_first() else {
        return 0;
    };
    let first = first.as_ref();

    let mut shared = first.len();
    for name in rest {
        let name = name.as_ref();
        shared = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(shared);
    }

    first[..shared]
        .char_indices()
        .filter(|(_, c)| std::path::is_separator(*c))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0)
}

/// Serialise placements in packing order followed by the PNG canvas
pub fn encode_image_atlas(atlas: &Atlas, png: &[u8]) -> Result<Vec<u8>> {
    let names: Vec<&str> = atlas.placements.iter().map(|p| p.name.as_str()).collect();
    let strip = common_prefix_len(&names);

    let mut w = ByteWriter::with_capacity(8 + atlas.placements.len() * 48 + png.len());
    w.bytes(IMAGE_ATLAS_MAGIC);
    w.len_i32(atlas.placements.len(), "entry count")?;

    for placed in &atlas.placements {
        let name = &placed.name.as_bytes()[strip..];
        w.len_i32(name.len(), "name length")?;
        w.bytes(name);

        let r = placed.rect;
        w.len_i32(r.x, "x")?;
        w.len_i32(r.y, "y")?;
        w.len_i32(r.width, "width")?;
        w.len_i32(r.height, "height")?;

        let tc = atlas.tex_coords(&r);
        w.f32(tc.tx);
        w.f32(tc.ty);
        w.f32(tc.tx2);
        w.f32(tc.ty2);
    }

    w.bytes(png);
    Ok(w.finish())
}

pub fn decode_image_atlas(bytes: &[u8]) -> Result<DecodedImageAtlas, AtlasError> {
    let mut r = ByteReader::new(bytes);
    if r.take(4).map_err(|_e| bad("Bad magic, NGAT expected"))? != IMAGE_ATLAS_MAGIC {
        return Err(bad("Bad magic, NGAT expected"));
    }

    let count = r.count("entry count")?;
    let mut entries = Vec::new();
    for _ in 0..count {
        let len = r.count("name length")?;
        let name = std::str::from_utf8(r.take(len)?)
            .map_err(|e| bad(&format!("entry name is not UTF-8: {e}")))?
            .to_string();
        let rect = read_rect(&mut r)?;
        let tex = TexCoords {
            tx: r.f32()?,
            ty: r.f32()?,
            tx2: r.f32()?,
            ty2: r.f32()?,
        };
        entries.push(ImageEntry { name, rect, tex });
    }

    Ok(DecodedImageAtlas {
        entries,
        png: r.rest().to_vec(),
    })
}

fn read_rect(r: &mut ByteReader<'_>) -> Result<Rect, AtlasError> {
    let mut field = |what: &str| {
        r.count(what)
            .and_then(|v| u32::try_from(v).map_err(|_e| bad(&format!("{what} out of range"))))
    };
    Ok(Rect {
        x: field("x")?,
        y: field("y")?,
        width: field("width")?,
        height: field("height")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasBuilder;
    use crate::item::{AtlasItem, PlacedItem};
    use crate::packing::{FitPath, FitResult};
    use image::RgbaImage;

    fn atlas_with(width: u32, height: u32, placements: Vec<(&str, Rect)>) -> Atlas {
        Atlas {
            width,
            height,
            image: RgbaImage::new(width, height),
            placements: placements
                .into_iter()
                .enumerate()
                .map(|(source_index, (name, rect))| PlacedItem {
                    name: name.to_string(),
                    rect,
                    source_index,
                })
                .collect(),
            fit: FitResult {
                width,
                height,
                path: FitPath::Shrink,
                initial: width,
                attempts: 1,
            },
        }
    }

    #[test]
    fn test_common_prefix_cut_at_separator() {
        assert_eq!(common_prefix_len(&["a/bc.png", "a/bd.png"]), 2);
        assert_eq!(common_prefix_len(&["sprites/hero.png"]), 8);
        assert_eq!(common_prefix_len(&["gfx/ui/ok.png", "gfx/units/tank.png"]), 4);
    }

    #[test]
    fn test_common_prefix_without_separator() {
        assert_eq!(common_prefix_len(&["hero.png", "helmet.png"]), 0);
        assert_eq!(common_prefix_len(&["a/x.png", "b/x.png"]), 0);
        assert_eq!(common_prefix_len::<&str>(&[]), 0);
    }

    #[test]
    fn test_common_prefix_multibyte() {
        assert_eq!(common_prefix_len(&["дом/окно.png", "дом/ой.png"]), "дом/".len());
    }

    #[test]
    fn test_single_entry_layout() {
        let atlas = atlas_with(128, 64, vec![("sprites/hero.png", Rect::new(32, 0, 32, 16))]);
        let bytes = encode_image_atlas(&atlas, b"PNG").unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"NGAT");
        expected.extend_from_slice(&1i32.to_le_bytes());
        expected.extend_from_slice(&8i32.to_le_bytes());
        expected.extend_from_slice(b"hero.png");
        for v in [32i32, 0, 32, 16] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        for v in [0.25f32, 0.0, 0.5, 0.25] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        expected.extend_from_slice(b"PNG");

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_decode_reads_back_entries() {
        let atlas = atlas_with(
            64,
            32,
            vec![
                ("a/bc.png", Rect::new(0, 0, 16, 16)),
                ("a/bd.png", Rect::new(16, 0, 8, 8)),
            ],
        );
        let bytes = encode_image_atlas(&atlas, &[1, 2, 3]).unwrap();
        let decoded = decode_image_atlas(&bytes).unwrap();

        let names: Vec<&str> = decoded.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bc.png", "bd.png"]);
        assert_eq!(decoded.entries[1].rect, Rect::new(16, 0, 8, 8));
        assert_eq!(decoded.entries[1].tex.tx, 0.25);
        assert_eq!(decoded.png, vec![1, 2, 3]);
    }

    #[test]
    fn test_built_atlas_keeps_packing_order() {
        let items = vec![
            AtlasItem::new("img/small.png", RgbaImage::new(4, 4)),
            AtlasItem::new("img/big.png", RgbaImage::new(16, 16)),
        ];
        let atlas = AtlasBuilder::new().build(items).unwrap();
        let decoded = decode_image_atlas(&encode_image_atlas(&atlas, &[]).unwrap()).unwrap();

        assert_eq!(decoded.entries[0].name, "big.png");
        assert_eq!(decoded.entries[1].name, "small.png");
    }

    #[test]
    fn test_bad_magic() {
        let err = decode_image_atlas(b"NGFN\0\0\0\0").unwrap_err();
        assert!(err.to_string().contains("NGAT"));
        assert!(matches!(decode_image_atlas(b"NG"), Err(AtlasError::BadAsset { .. })));
    }

    #[test]
    fn test_truncated_table() {
        let atlas = atlas_with(8, 8, vec![("x.png", Rect::new(0, 0, 8, 8))]);
        let bytes = encode_image_atlas(&atlas, &[]).unwrap();

        assert!(matches!(
            decode_image_atlas(&bytes[..bytes.len() - 2]),
            Err(AtlasError::BadAsset { .. })
        ));
    }
}
