mod common;

use cassette::{
    DecodeError, DecodeOptions,
    sans::{
        cel::CelContent,
        chunk::{Chunk, ChunkType, Policy, SkipReason},
        codec::{Pixels, Rgba},
        error::{Corruption, Unsupported},
        header::ColorDepth,
        layer::{BlendMode, LayerType},
    },
};
use common::*;

const INDEXED_PIXELS: [u8; 6] = [0, 1, 2, 2, 1, 0];

fn indexed_fixture() -> Fixture {
    Fixture::new(3, 2, 8).frame(
        FrameFixture::new(100)
            .chunk(PALETTE, palette_body(&[[0, 0, 0, 255], [255, 0, 0, 255], [0, 0, 255, 255]]))
            .chunk(LAYER, layer_body(0, "Background").finish())
            .chunk(CEL, compressed_cel(0, 3, 2, &INDEXED_PIXELS)),
    )
}

#[test]
fn decode_minimal_indexed() {
    let data = indexed_fixture().build();
    let document = cassette::decode(&data).unwrap();

    let header = document.header();
    assert_eq!(header.file_size as usize, data.len());
    assert_eq!(header.color_depth, ColorDepth::Indexed);
    assert_eq!((header.width, header.height), (3, 2));
    assert!(document.diagnostics().is_empty());

    let [frame] = document.frames() else {
        panic!("expected one frame");
    };
    assert_eq!(frame.duration, 100);
    assert_eq!(frame.chunks.len(), 3);

    let layers: Vec<_> = document.layers().collect();
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0].name, "Background");
    assert_eq!(layers[0].layer_type, LayerType::Normal);
    assert_eq!(layers[0].blend_mode, BlendMode::Normal);
    assert!(layers[0].flags.visible && layers[0].flags.editable);

    let cels: Vec<_> = frame.cels().collect();
    assert_eq!(cels.len(), 1);
    assert_eq!((cels[0].x, cels[0].y, cels[0].opacity), (1, -2, 200));

    let CelContent::Image(image) = &cels[0].content else {
        panic!("expected an image cel");
    };
    assert_eq!((image.width, image.height), (3, 2));
    assert_eq!(image.pixels, Pixels::Indexed(INDEXED_PIXELS.to_vec()));
    assert_eq!(image.pixels.as_bytes(), &INDEXED_PIXELS);

    let palette = document.palette().unwrap();
    assert_eq!(
        palette,
        [
            Rgba { r: 0, g: 0, b: 0, a: 255 },
            Rgba { r: 255, g: 0, b: 0, a: 255 },
            Rgba { r: 0, g: 0, b: 255, a: 255 },
        ]
    );
}

#[test]
fn decode_rgba_cel() {
    let pixels = [10, 20, 30, 255, 40, 50, 60, 128];
    let data = Fixture::new(2, 1, 32)
        .frame(
            FrameFixture::new(50)
                .chunk(LAYER, layer_body(0, "Ink").finish())
                .chunk(CEL, compressed_cel(0, 2, 1, &pixels)),
        )
        .build();

    let document = cassette::decode(&data).unwrap();
    let cel = document.frames()[0].cels().next().unwrap();

    let CelContent::Image(image) = &cel.content else {
        panic!("expected an image cel");
    };
    assert_eq!(
        image.pixels,
        Pixels::Rgba(vec![
            Rgba { r: 10, g: 20, b: 30, a: 255 },
            Rgba { r: 40, g: 50, b: 60, a: 128 },
        ])
    );
    assert_eq!(image.pixels.len(), 2);
}

#[test]
fn decode_grayscale_cel() {
    let data = Fixture::new(1, 2, 16)
        .frame(FrameFixture::new(50).chunk(CEL, compressed_cel(0, 1, 2, &[7, 255, 9, 0])))
        .build();

    let document = cassette::decode(&data).unwrap();
    let cel = document.frames()[0].cels().next().unwrap();

    let CelContent::Image(image) = &cel.content else {
        panic!("expected an image cel");
    };
    assert_eq!(image.pixels.color_depth(), ColorDepth::Grayscale);
    assert_eq!(image.pixels.as_bytes(), &[7, 255, 9, 0]);
}

#[test]
fn bad_header_magic() {
    let mut fixture = indexed_fixture();
    fixture.magic = 0x0000;

    let err = cassette::decode(&fixture.build()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::BadMagicNumber {
            expected: 0xA5E0,
            found: 0x0000
        }
    );
}

#[test]
fn bad_header_magic_on_short_input() {
    let data = Writer::new().u32(6).u16(0x4B50).finish();

    let err = cassette::decode(&data).unwrap_err();
    assert_eq!(
        err,
        DecodeError::BadMagicNumber {
            expected: 0xA5E0,
            found: 0x4B50
        }
    );
}

#[test]
fn bad_frame_magic() {
    let mut fixture = indexed_fixture();
    fixture.frames[0].magic = 0x1234;

    let err = cassette::decode(&fixture.build()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::BadMagicNumber {
            expected: 0xF1FA,
            found: 0x1234
        }
    );
}

#[test]
fn file_size_mismatch() {
    let mut data = indexed_fixture().build();
    let len = data.len();
    data.extend_from_slice(&[0; 4]);

    let err = cassette::decode(&data).unwrap_err();
    assert_eq!(
        err,
        DecodeError::SizeMismatch {
            declared: len,
            actual: len + 4
        }
    );
}

#[test]
fn truncated_layer_name() {
    // Declares a 10-byte name but the chunk ends after 4.
    let body = layer_body(0, "")
        .finish()
        .into_iter()
        .take(16)
        .chain([10, 0, b'L', b'a', b'y', b'e'])
        .collect::<Vec<_>>();

    let data = Fixture::new(1, 1, 8)
        .frame(FrameFixture::new(100).chunk(LAYER, body))
        .build();

    let err = cassette::decode(&data).unwrap_err();
    assert!(matches!(err, DecodeError::OutOfBounds { need: 10, remaining: 4, .. }), "{err:?}");
}

#[test]
fn chunk_declared_beyond_input() {
    let mut data = indexed_fixture().build();

    // Inflate the first chunk's declared size past the end of the file.
    let offset = 128 + 16;
    data[offset..offset + 4].copy_from_slice(&10_000u32.to_le_bytes());

    let err = cassette::decode(&data).unwrap_err();
    assert!(matches!(err, DecodeError::OutOfBounds { .. }), "{err:?}");
}

#[test]
fn chunk_declared_below_header_size() {
    let mut data = indexed_fixture().build();

    let offset = 128 + 16;
    data[offset..offset + 4].copy_from_slice(&3u32.to_le_bytes());

    let err = cassette::decode(&data).unwrap_err();
    assert_eq!(
        err,
        DecodeError::SizeMismatch {
            declared: 3,
            actual: 6
        }
    );
}

fn unknown_chunks(n: usize) -> FrameFixture {
    (0..n).fold(FrameFixture::new(10), |f, i| f.chunk(0x7777, vec![i as u8]))
}

#[test]
fn chunk_count_from_legacy_field() {
    let mut frame = unknown_chunks(5);
    frame.counts = Some((5, 0));

    let data = Fixture::new(1, 1, 8).frame(frame).build();
    let document = cassette::decode(&data).unwrap();

    assert_eq!(document.diagnostics().len(), 5);
}

#[test]
fn chunk_count_from_new_field() {
    let mut frame = unknown_chunks(37);
    frame.counts = Some((0xFFFF, 37));

    let data = Fixture::new(1, 1, 8).frame(frame).build();
    let document = cassette::decode(&data).unwrap();

    assert_eq!(document.diagnostics().len(), 37);
    assert!(
        document
            .diagnostics()
            .iter()
            .all(|d| d.frame == 0 && d.skipped.reason == SkipReason::Unknown)
    );
}

#[test]
fn layer_uuid_follows_header_flag() {
    let uuid = [7; 16];

    let with = Fixture {
        flags: 0b101,
        ..Fixture::new(1, 1, 32)
    }
    .frame(FrameFixture::new(1).chunk(LAYER, layer_body(0, "A").bytes(&uuid).finish()))
    .build();

    let without = Fixture::new(1, 1, 32)
        .frame(FrameFixture::new(1).chunk(LAYER, layer_body(0, "A").finish()))
        .build();

    let with = cassette::decode(&with).unwrap();
    let without = cassette::decode(&without).unwrap();

    assert!(with.header().flags.layers_have_uuid);
    assert_eq!(with.layers().next().unwrap().uuid, Some(uuid));
    assert!(!without.header().flags.layers_have_uuid);
    assert_eq!(without.layers().next().unwrap().uuid, None);
}

#[test]
fn unknown_chunks_are_skipped() {
    let data = Fixture::new(1, 1, 8)
        .frame(
            FrameFixture::new(100)
                .chunk(0x1234, vec![1, 2, 3, 4, 5])
                .chunk(MASK, vec![0; 12])
                .chunk(LAYER, layer_body(0, "After").finish()),
        )
        .build();

    let document = cassette::decode(&data).unwrap();

    assert_eq!(document.layers().next().unwrap().name, "After");

    let reasons: Vec<_> = document
        .diagnostics()
        .iter()
        .map(|d| d.skipped.reason.clone())
        .collect();
    assert_eq!(
        reasons,
        [SkipReason::Unknown, SkipReason::Unsupported(ChunkType::Mask)]
    );
    assert_eq!(document.diagnostics()[0].skipped.header.tag, 0x1234);
    assert_eq!(document.diagnostics()[0].skipped.offset, 128 + 16);
}

fn icc_fixture() -> Vec<u8> {
    let icc = Writer::new()
        .u16(2)
        .u16(0)
        .i32(0)
        .zeros(8)
        .u32(4)
        .bytes(&[1, 2, 3, 4])
        .finish();

    Fixture::new(1, 1, 32)
        .frame(
            FrameFixture::new(100)
                .chunk(COLOR_PROFILE, icc)
                .chunk(LAYER, layer_body(0, "Kept").finish()),
        )
        .build()
}

#[test]
fn unsupported_feature_skipped_by_default() {
    let document = cassette::decode(&icc_fixture()).unwrap();

    assert_eq!(document.layers().count(), 1);
    assert_eq!(document.diagnostics().len(), 1);
    assert_eq!(
        document.diagnostics()[0].skipped.reason,
        SkipReason::Failed(DecodeError::UnsupportedFeature(Unsupported::IccProfile))
    );
}

#[test]
fn unsupported_feature_aborts_on_request() {
    let options = DecodeOptions::new().policy(Policy::Abort);
    let err = cassette::avec::decode_slice(&icc_fixture(), &options).unwrap_err();

    assert_eq!(
        err,
        DecodeError::UnsupportedFeature(Unsupported::IccProfile)
    );
}

fn short_cel_fixture() -> Vec<u8> {
    // Declares 3x2 pixels but compresses only 4.
    Fixture::new(3, 2, 8)
        .frame(FrameFixture::new(100).chunk(CEL, compressed_cel(0, 3, 2, &[1, 2, 3, 4])))
        .build()
}

#[test]
fn corrupt_payload_skipped_by_default() {
    let document = cassette::decode(&short_cel_fixture()).unwrap();

    assert_eq!(document.frames()[0].cels().count(), 0);
    assert_eq!(
        document.diagnostics()[0].skipped.reason,
        SkipReason::Failed(DecodeError::CorruptPayload(Corruption::Length {
            expected: 6,
            found: 4
        }))
    );
}

#[test]
fn corrupt_payload_aborts_on_request() {
    let options = DecodeOptions::new().policy(Policy::Abort);
    let err = cassette::avec::decode_slice(&short_cel_fixture(), &options).unwrap_err();

    assert!(matches!(err, DecodeError::CorruptPayload(_)), "{err:?}");
}

#[test]
fn oversized_payload_is_corrupt() {
    let data = Fixture::new(1, 1, 8)
        .frame(FrameFixture::new(100).chunk(CEL, compressed_cel(0, 1, 1, &[1, 2, 3, 4])))
        .build();

    let options = DecodeOptions::new().policy(Policy::Abort);
    let err = cassette::avec::decode_slice(&data, &options).unwrap_err();

    assert_eq!(
        err,
        DecodeError::CorruptPayload(Corruption::Overflow { expected: 1 })
    );
}

#[test]
fn ignored_chunk_types() {
    let options = DecodeOptions::new()
        .ignore(ChunkType::Cel)
        .ignore(ChunkType::Cel);
    assert_eq!(options.ignored, [ChunkType::Cel]);

    let document = cassette::avec::decode_slice(&indexed_fixture().build(), &options).unwrap();

    assert_eq!(document.frames()[0].cels().count(), 0);
    assert_eq!(document.layers().count(), 1);
    assert_eq!(
        document.diagnostics()[0].skipped.reason,
        SkipReason::Ignored(ChunkType::Cel)
    );
}

#[test]
fn multiple_frames_with_linked_cel() {
    let data = Fixture::new(3, 2, 8)
        .frame(
            FrameFixture::new(100)
                .chunk(LAYER, layer_body(0, "Body").finish())
                .chunk(CEL, compressed_cel(0, 3, 2, &INDEXED_PIXELS)),
        )
        .frame(FrameFixture::new(250).chunk(CEL, cel_header(0, 1).u16(0).finish()))
        .build();

    let document = cassette::decode(&data).unwrap();
    assert_eq!(document.frames().len(), 2);
    assert_eq!(document.frames()[1].duration, 250);

    let cel = document.frames()[1].cels().next().unwrap();
    assert_eq!(cel.content, CelContent::Linked { frame: 0 });
    assert!(matches!(
        document.frames()[1].chunks[0],
        Chunk::Cel(_)
    ));
}

#[test]
fn old_palette_used_without_new_palette() {
    let old = Writer::new()
        .u16(1)
        .u8(1)
        .u8(2)
        .bytes(&[1, 2, 3, 4, 5, 6])
        .finish();

    let data = Fixture::new(1, 1, 8)
        .frame(FrameFixture::new(100).chunk(OLD_PALETTE_256, old))
        .build();

    let palette = cassette::decode(&data).unwrap().palette().unwrap();
    assert_eq!(
        palette,
        [
            Rgba::default(),
            Rgba { r: 1, g: 2, b: 3, a: 255 },
            Rgba { r: 4, g: 5, b: 6, a: 255 },
        ]
    );
}

#[test]
fn oversized_palette_skipped() {
    let palette = Writer::new()
        .u32(0x0400_0000)
        .u32(0)
        .u32(0)
        .zeros(8)
        .u16(0)
        .bytes(&[1, 2, 3, 255])
        .finish();

    let data = Fixture::new(1, 1, 8)
        .frame(FrameFixture::new(100).chunk(PALETTE, palette))
        .build();

    let document = cassette::decode(&data).unwrap();

    assert_eq!(document.palette(), None);
    assert_eq!(
        document.diagnostics()[0].skipped.reason,
        SkipReason::Failed(DecodeError::CorruptPayload(Corruption::PaletteSize {
            size: 0x0400_0000,
            last: 0
        }))
    );
}

#[test]
fn decode_reader() {
    let data = indexed_fixture().build();
    let document =
        cassette::avec::decode_reader(&mut data.as_slice(), &DecodeOptions::default()).unwrap();

    assert_eq!(document.frames().len(), 1);
}

#[test]
fn empty_input() {
    let err = cassette::decode(&[]).unwrap_err();
    assert!(matches!(err, DecodeError::OutOfBounds { offset: 0, .. }), "{err:?}");
}
