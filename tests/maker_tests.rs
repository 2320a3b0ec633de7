//! Texture Maker Tests
//!
//! Tests for:
//! - Original returned directly when size and capabilities already match
//! - Resample fallback sized to the producer's logical dimensions
//! - Mip-chain and power-of-two requirements
//! - Generator-supplied copy override
//! - Volatile generators, exhausted generators and allocation failures
//! - Sampling stages over made textures

mod common;

use std::sync::Arc;

use glam::Vec2;

use common::{CountingExecutor, Harness, OverrideGenerator, ScriptedGenerator};
use tessel::{
    CapsSettings, ColorMode, ColorSpace, CopyParams, FilterConstraint, FilterMode, Rect,
    SampleFilter, SamplerParams, SamplingRequest, TesselError, TextureMaker, TextureProducer,
    TileMode,
};

const EPSILON: f32 = 1e-5;

fn bilinear() -> SamplerParams {
    SamplerParams::clamp(FilterMode::Bilinear)
}

// ============================================================================
// Direct Original
// ============================================================================

#[test]
fn matching_original_needs_no_copy() {
    let mut h = Harness::compatible();
    let generator = ScriptedGenerator::stable(64, 64);
    let original = generator.original.clone().unwrap();
    let mut maker = TextureMaker::new(generator, 64, 64, false);

    let (tex, _) = maker
        .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)
        .unwrap();

    assert!(Arc::ptr_eq(&tex, &original));
    assert_eq!(h.executor.total(), 0);
    assert!(h.cache.is_empty());
    assert!(maker.generator().cached_copies.is_empty());
}

#[test]
fn generator_color_space_is_reported() {
    let mut h = Harness::compatible();
    let mut generator = ScriptedGenerator::stable(8, 8);
    generator.color_space = Some(ColorSpace::Srgb);
    let mut maker = TextureMaker::new(generator, 8, 8, true);

    let (_, color_space) = maker
        .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::GammaCorrect)
        .unwrap();
    assert_eq!(color_space, Some(ColorSpace::Srgb));
    assert!(maker.is_alpha_only());
}

// ============================================================================
// Resample Fallback
// ============================================================================

#[test]
fn differently_sized_original_is_resampled_once() -> anyhow::Result<()> {
    let mut h = Harness::compatible();
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(128, 128), 64, 64, false);

    let (first, _) = maker.resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)?;
    assert_eq!((first.width(), first.height()), (64, 64));
    assert_eq!(h.executor.resamples.len(), 1);
    assert_eq!(h.executor.resamples[0].filter, FilterMode::Bilinear);
    assert!(h.executor.render_copies.is_empty());
    assert_eq!(h.cache.insert_count(), 1);
    assert_eq!(maker.generator().cached_copies.len(), 1);

    let (second, _) = maker.resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)?;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(h.executor.resamples.len(), 1);
    assert_eq!(h.cache.insert_count(), 1);
    Ok(())
}

#[test]
fn mipmapped_request_builds_a_mip_chain() {
    let mut h = Harness::new(CapsSettings::default());
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(64, 64), 64, 64, false);

    let (tex, _) = maker
        .resolve_for_params(
            &mut h.ctx(),
            &SamplerParams::clamp(FilterMode::MipMap),
            ColorMode::Legacy,
        )
        .unwrap();

    assert!(tex.has_mips());
    let desc = h.executor.resamples[0];
    assert!(desc.mipped);
    assert_eq!(desc.filter, FilterMode::Nearest);
    assert_eq!(maker.generator().last_will_be_mipped, Some(true));
}

#[test]
fn mipmap_request_without_mip_support_uses_original() {
    let caps = CapsSettings {
        mipmap_support: false,
        ..Default::default()
    };
    let mut h = Harness::new(caps);
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(64, 64), 64, 64, false);

    let (tex, _) = maker
        .resolve_for_params(
            &mut h.ctx(),
            &SamplerParams::clamp(FilterMode::MipMap),
            ColorMode::Legacy,
        )
        .unwrap();
    assert!(!tex.has_mips());
    assert_eq!(h.executor.total(), 0);
    assert_eq!(maker.generator().last_will_be_mipped, Some(false));
}

#[test]
fn npot_tiling_resamples_to_pow2() {
    let caps = CapsSettings {
        npot_tile_support: false,
        ..Default::default()
    };
    let mut h = Harness::new(caps);
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(100, 60), 100, 60, false);
    let repeat = SamplerParams::new(TileMode::Repeat, FilterMode::Bilinear);

    let (tex, _) = maker
        .resolve_for_params(&mut h.ctx(), &repeat, ColorMode::Legacy)
        .unwrap();
    assert_eq!((tex.width(), tex.height()), (128, 64));
    assert_eq!(h.executor.resamples[0].filter, FilterMode::Bilinear);
}

// ============================================================================
// Generator Override
// ============================================================================

#[test]
fn override_replaces_the_resample() {
    let mut h = Harness::compatible();
    let generator = OverrideGenerator {
        inner: ScriptedGenerator::stable(128, 128),
        synthesized: Vec::new(),
    };
    let mut maker = TextureMaker::new(generator, 64, 64, false);

    let (tex, _) = maker
        .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)
        .unwrap();

    assert_eq!((tex.width(), tex.height()), (64, 64));
    assert_eq!(h.executor.total(), 0);
    assert_eq!(
        maker.generator().synthesized,
        vec![CopyParams::new(FilterMode::Bilinear, 64, 64)]
    );
    assert_eq!(h.cache.len(), 1);
    assert_eq!(maker.generator().inner.cached_copies.len(), 1);
}

// ============================================================================
// Volatile and Failing Sources
// ============================================================================

#[test]
fn volatile_generator_copies_are_never_cached() {
    let mut h = Harness::compatible();
    let mut maker = TextureMaker::new(ScriptedGenerator::volatile(128, 128), 64, 64, false);

    for _ in 0..3 {
        maker
            .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)
            .unwrap();
    }
    assert_eq!(h.executor.resamples.len(), 3);
    assert!(h.cache.is_empty());
    assert_eq!(h.cache.insert_count(), 0);
    assert!(maker.generator().cached_copies.is_empty());
}

#[test]
fn exhausted_generator_is_source_unavailable() {
    let mut h = Harness::compatible();
    let mut maker = TextureMaker::new(ScriptedGenerator::exhausted(), 32, 32, false);

    let err = maker
        .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)
        .unwrap_err();
    assert_eq!(err, TesselError::SourceUnavailable);
    assert_eq!(h.executor.total(), 0);
    assert!(h.cache.is_empty());

    let request = SamplingRequest::new(32, 32, SampleFilter::Bilinear);
    let err = maker
        .create_sampling_stage(&mut h.ctx(), &request, None, ColorMode::Legacy)
        .unwrap_err();
    assert_eq!(err, TesselError::SourceUnavailable);
}

#[test]
fn failed_resample_inserts_nothing() {
    let mut h = Harness::compatible();
    h.executor = CountingExecutor::failing();
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(128, 128), 64, 64, false);

    let err = maker
        .resolve_for_params(&mut h.ctx(), &bilinear(), ColorMode::Legacy)
        .unwrap_err();
    assert!(matches!(err, TesselError::CopyAllocationFailed(_)));
    assert!(h.cache.is_empty());
    assert!(maker.generator().cached_copies.is_empty());
}

// ============================================================================
// Sampling Stages
// ============================================================================

#[test]
fn stretched_copy_is_normalized_to_logical_size() {
    let caps = CapsSettings {
        npot_tile_support: false,
        ..Default::default()
    };
    let mut h = Harness::new(caps);
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(100, 60), 100, 60, false);
    let request = SamplingRequest::new(100, 60, SampleFilter::MipMap);

    let stage = maker
        .create_sampling_stage(&mut h.ctx(), &request, None, ColorMode::Legacy)
        .unwrap();

    assert_eq!((stage.texture.width(), stage.texture.height()), (128, 64));
    let far = stage.map_point(Vec2::new(100.0, 60.0));
    assert!((far - Vec2::ONE).abs().max_element() < EPSILON);
    let mid = stage.map_point(Vec2::new(50.0, 30.0));
    assert!((mid - Vec2::splat(0.5)).abs().max_element() < EPSILON);
    assert_eq!(stage.sampler.filter, FilterMode::MipMap);
}

#[test]
fn strict_mipmap_constraint_keeps_mips_with_a_domain() {
    let mut h = Harness::new(CapsSettings::default());
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(64, 64), 64, 64, false);
    let request = SamplingRequest::new(64, 64, SampleFilter::MipMap).with_constraint(
        Rect::from_ltrb(8.0, 8.0, 24.0, 24.0),
        FilterConstraint::Strict,
        false,
    );

    let stage = maker
        .create_sampling_stage(&mut h.ctx(), &request, None, ColorMode::Legacy)
        .unwrap();

    assert_eq!(stage.filter, SampleFilter::MipMap);
    let domain = stage.domain.expect("strict constraint needs a domain");
    assert!((domain.left - 8.5 / 64.0).abs() < EPSILON);
    assert!((domain.right - 23.5 / 64.0).abs() < EPSILON);
}

#[test]
fn empty_logical_size_is_rejected_before_resolving() {
    let mut h = Harness::compatible();
    let mut maker = TextureMaker::new(ScriptedGenerator::stable(64, 64), 0, 32, false);
    let request = SamplingRequest::new(0, 32, SampleFilter::Bilinear);

    let err = maker
        .create_sampling_stage(&mut h.ctx(), &request, None, ColorMode::Legacy)
        .unwrap_err();
    assert!(matches!(
        err,
        TesselError::InvalidConstraint {
            width: 0,
            height: 32,
            ..
        }
    ));
    assert_eq!(h.executor.total(), 0);
    assert!(h.cache.is_empty());
    assert_eq!(maker.generator().originals_requested, 0);
}
