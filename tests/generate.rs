//! End-to-end runs of the generation pipeline against synthesized inputs.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde_json::json;

use iconwolf::output::files;
use iconwolf::{BannerOptions, GeneratorOptions, IconError, VariantFlags, generate, is_bundle};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn source_png(dir: &Path, size: u32) -> PathBuf {
    let path = dir.join("source.png");
    RgbaImage::from_pixel(size, size, Rgba([255, 107, 53, 255]))
        .save(&path)
        .unwrap();
    path
}

fn mock_bundle(dir: &Path) -> PathBuf {
    let bundle = dir.join("Test.icon");
    let assets = bundle.join("Assets");
    fs::create_dir_all(&assets).unwrap();
    RgbaImage::from_pixel(200, 200, Rgba([255, 107, 53, 255]))
        .save(assets.join("logo.png"))
        .unwrap();

    let manifest = json!({
        "fill": {
            "linear-gradient": [
                "display-p3:0.00000,0.67451,0.92941,1.00000",
                "display-p3:0.03529,0.08235,0.20000,1.00000"
            ],
            "orientation": { "start": { "x": 0.5, "y": 0 }, "stop": { "x": 0.5, "y": 0.7 } }
        },
        "groups": [{
            "layers": [{
                "image-name": "logo.png",
                "name": "logo",
                "position": { "scale": 1.0, "translation-in-points": [0, 0] }
            }]
        }]
    });
    fs::write(bundle.join("icon.json"), manifest.to_string()).unwrap();
    bundle
}

fn options(input: &Path, output: &Path) -> GeneratorOptions {
    GeneratorOptions {
        silent: true,
        ..GeneratorOptions::new(input, output)
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn every_variant() -> VariantFlags {
    VariantFlags {
        android: true,
        favicon: true,
        splash: true,
        icon: true,
    }
}

#[test]
fn no_flags_generates_every_variant() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("all");

    let results = generate(&options(&source_png(dir.path(), 1024), &out)).unwrap();

    // Android contributes only its foreground unless requested explicitly.
    assert_eq!(
        file_names(&out),
        [
            files::ANDROID_FOREGROUND,
            files::FAVICON,
            files::ICON,
            files::SPLASH_ICON
        ]
    );
    for result in &results {
        assert_eq!(result.size, fs::metadata(&result.file_path).unwrap().len());
    }
}

#[test]
fn all_flags_generate_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("all");
    let opts = GeneratorOptions {
        variants: every_variant(),
        ..options(&source_png(dir.path(), 1024), &out)
    };

    let results = generate(&opts).unwrap();

    assert_eq!(results.len(), files::ALL.len());
    for name in files::ALL {
        assert!(out.join(name).is_file(), "{name} missing");
    }
}

#[test]
fn icon_flag_generates_only_icon() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("icon-only");
    let opts = GeneratorOptions {
        variants: VariantFlags {
            icon: true,
            ..VariantFlags::default()
        },
        ..options(&source_png(dir.path(), 1024), &out)
    };

    let results = generate(&opts).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(file_names(&out), ["icon.png"]);
}

#[test]
fn android_flag_generates_three_layers() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("android");
    let opts = GeneratorOptions {
        variants: VariantFlags {
            android: true,
            ..VariantFlags::default()
        },
        ..options(&source_png(dir.path(), 512), &out)
    };

    generate(&opts).unwrap();
    assert_eq!(
        file_names(&out),
        [
            "adaptive-icon.png",
            "android-icon-background.png",
            "monochrome-icon.png"
        ]
    );
}

#[test]
fn non_square_source_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wide.png");
    RgbaImage::new(200, 100).save(&input).unwrap();

    let err = generate(&options(&input, &dir.path().join("out"))).unwrap_err();
    assert!(matches!(err, IconError::Validation(_)));
    assert!(err.to_string().contains("square"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn jpeg_source_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 64))
        .save_with_format(&input, image::ImageFormat::Jpeg)
        .unwrap();

    let err = generate(&options(&input, &dir.path().join("out"))).unwrap_err();
    assert!(matches!(err, IconError::Validation(_)));
}

#[test]
fn bundle_input_uses_extracted_background() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("from-bundle");
    let opts = GeneratorOptions {
        variants: VariantFlags {
            android: true,
            ..VariantFlags::default()
        },
        ..options(&mock_bundle(dir.path()), &out)
    };

    generate(&opts).unwrap();

    let bg = image::open(out.join(files::ANDROID_BACKGROUND))
        .unwrap()
        .to_rgba8();
    assert_eq!(bg.get_pixel(0, 0).0, [0x00, 0xAC, 0xED, 255]);
}

#[test]
fn explicit_background_overrides_bundle_color() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("override");
    let opts = GeneratorOptions {
        variants: VariantFlags {
            android: true,
            ..VariantFlags::default()
        },
        bg_color: "#112233".to_string(),
        ..options(&mock_bundle(dir.path()), &out)
    };

    generate(&opts).unwrap();

    let bg = image::open(out.join(files::ANDROID_BACKGROUND))
        .unwrap()
        .to_rgba8();
    assert_eq!(bg.get_pixel(0, 0).0, [0x11, 0x22, 0x33, 255]);
}

#[test]
fn bundle_splash_uses_foreground_only() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("splash");
    let opts = GeneratorOptions {
        variants: VariantFlags {
            splash: true,
            ..VariantFlags::default()
        },
        ..options(&mock_bundle(dir.path()), &out)
    };

    generate(&opts).unwrap();

    let splash = image::open(out.join(files::SPLASH_ICON)).unwrap().to_rgba8();
    // Outside the 200px logo the foreground is transparent, not the gradient.
    assert_eq!(splash.get_pixel(10, 10)[3], 0);
    assert_eq!(splash.get_pixel(512, 512)[3], 255);
}

#[test]
fn separate_splash_input() {
    let dir = tempfile::tempdir().unwrap();
    let splash_src = dir.path().join("splash-src.png");
    RgbaImage::from_pixel(256, 256, Rgba([0, 0, 255, 255]))
        .save(&splash_src)
        .unwrap();
    let out = dir.path().join("out");

    let opts = GeneratorOptions {
        variants: VariantFlags {
            splash: true,
            ..VariantFlags::default()
        },
        splash_input_path: Some(splash_src),
        ..options(&source_png(dir.path(), 1024), &out)
    };
    generate(&opts).unwrap();

    let splash = image::open(out.join(files::SPLASH_ICON)).unwrap().to_rgba8();
    let p = splash.get_pixel(512, 512).0;
    assert!(p[2] > 250 && p[0] < 5, "expected blue, got {p:?}");
}

#[test]
fn missing_splash_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let opts = GeneratorOptions {
        splash_input_path: Some(dir.path().join("missing.png")),
        ..options(&source_png(dir.path(), 1024), &dir.path().join("out"))
    };

    let err = generate(&opts).unwrap_err();
    assert!(matches!(err, IconError::NotFound(_)));
    assert!(err.to_string().contains("Splash source not found"));
}

#[test]
fn icon_output_authors_a_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("AppIcon.icon");
    let opts = GeneratorOptions {
        bg_color: "#FF0000".to_string(),
        dark_bg_color: Some("#000000".to_string()),
        ..options(&source_png(dir.path(), 1024), &output)
    };

    let results = generate(&opts).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file_path, output);
    assert!(is_bundle(&output));

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(output.join("icon.json")).unwrap()).unwrap();
    assert_eq!(
        manifest["fill-specializations"][0]["value"]["solid"],
        "srgb:1.00000,0.00000,0.00000,1.00000"
    );
}

#[test]
fn banner_skips_favicon_and_android_background() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("banner");
    let plain_out = dir.path().join("plain");
    let input = source_png(dir.path(), 1024);

    let plain = GeneratorOptions {
        variants: every_variant(),
        ..options(&input, &plain_out)
    };
    generate(&plain).unwrap();
    let opts = GeneratorOptions {
        output_dir: out.clone(),
        banner: Some(BannerOptions::new("DEV")),
        ..plain
    };
    generate(&opts).unwrap();

    let read = |d: &Path, name: &str| fs::read(d.join(name)).unwrap();
    for name in [files::FAVICON, files::ANDROID_BACKGROUND, files::ANDROID_MONOCHROME] {
        assert_eq!(read(&out, name), read(&plain_out, name), "{name} changed");
    }
    for name in [files::ICON, files::ANDROID_FOREGROUND, files::SPLASH_ICON] {
        assert_ne!(read(&out, name), read(&plain_out, name), "{name} unchanged");
    }

    let icon = image::open(out.join(files::ICON)).unwrap().to_rgba8();
    // DEV ribbon is green (#4CAF50) across the top-left corner.
    let p = icon.get_pixel(120, 290).0;
    assert!(p[1] > p[0] && p[1] > p[2], "expected ribbon green, got {p:?}");
}
