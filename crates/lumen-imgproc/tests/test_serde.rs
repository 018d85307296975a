#![cfg(feature = "serde")]

use lumen_imgproc::border::BorderMode;
use lumen_imgproc::filter::FilterOptions;
use lumen_imgproc::parallel::ExecutionStrategy;

#[test]
fn filter_options_roundtrip() -> Result<(), serde_json::Error> {
    let options = FilterOptions {
        border_x: BorderMode::Wrap,
        border_y: BorderMode::Mirror,
        preserve_alpha: true,
        strategy: ExecutionStrategy::Fixed(4),
    };

    let json = serde_json::to_string(&options)?;
    let decoded: FilterOptions = serde_json::from_str(&json)?;
    assert_eq!(decoded, options);
    Ok(())
}

#[test]
fn filter_options_missing_fields_use_defaults() -> Result<(), serde_json::Error> {
    let options: FilterOptions = serde_json::from_str(r#"{ "border_y": "Bounce" }"#)?;
    assert_eq!(options.border_x, BorderMode::Repeat);
    assert_eq!(options.border_y, BorderMode::Bounce);
    assert!(!options.preserve_alpha);
    assert_eq!(options.strategy, ExecutionStrategy::Serial);
    Ok(())
}

#[test]
fn resize_mode_roundtrip() -> Result<(), serde_json::Error> {
    use lumen_imgproc::resize::{AnchorPosition, ResizeMode, TargetRect};

    let mode = ResizeMode::Manual(TargetRect::new(-4, 2, 30, 0));
    let json = serde_json::to_string(&mode)?;
    assert_eq!(serde_json::from_str::<ResizeMode>(&json)?, mode);

    let position: AnchorPosition = serde_json::from_str(r#""BottomLeft""#)?;
    assert_eq!(position, AnchorPosition::BottomLeft);
    Ok(())
}
