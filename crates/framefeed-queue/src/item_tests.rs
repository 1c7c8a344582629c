use super::*;

#[test]
fn test_media_type_from_filename() {
    assert_eq!(MediaType::from_filename("frame_1.JPG"), Some(MediaType::Jpeg));
    assert_eq!(MediaType::from_filename("dir/frame.jpeg"), Some(MediaType::Jpeg));
    assert_eq!(MediaType::from_filename("frame.png"), Some(MediaType::Png));
    assert_eq!(MediaType::from_filename("frame.webp"), None);
    assert_eq!(MediaType::from_filename("frame"), None);
}

#[test]
fn test_media_type_from_mime() {
    assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
    assert_eq!(MediaType::from_mime("IMAGE/JPEG"), Some(MediaType::Jpeg));
    assert_eq!(MediaType::from_mime("image/gif"), None);
}

#[test]
fn test_data_url_format() {
    let payload = ImagePayload::new(MediaType::Png, vec![1, 2, 3]);
    assert_eq!(payload.to_data_url(), "data:image/png;base64,AQID");

    let parsed = ImagePayload::from_data_url("data:image/png;base64,AQID").unwrap();
    assert_eq!(parsed, payload);
}

#[test]
fn test_data_url_rejects_unsupported_type() {
    let err = ImagePayload::from_data_url("data:image/gif;base64,AQID").unwrap_err();
    assert!(matches!(err, QueueError::UnsupportedFormat(mime) if mime == "image/gif"));
}

#[test]
fn test_data_url_rejects_malformed() {
    assert!(matches!(
        ImagePayload::from_data_url("image/png;base64,AQID"),
        Err(QueueError::InvalidPayload(_))
    ));
    assert!(matches!(
        ImagePayload::from_data_url("data:image/png,AQID"),
        Err(QueueError::InvalidPayload(_))
    ));
    assert!(matches!(
        ImagePayload::from_data_url("data:image/png;base64,@@@"),
        Err(QueueError::InvalidPayload(_))
    ));
}

#[test]
fn test_work_item_json_shape() {
    let item = WorkItem::new(ImagePayload::new(MediaType::Jpeg, vec![0xff]), "a cat");
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["image"], "data:image/jpeg;base64,/w==");
    assert_eq!(json["description"], "a cat");
    assert_eq!(json["negative_description"], "");
}

#[test]
fn test_work_item_negative_defaults_to_empty() {
    let json = serde_json::json!({
        "image": "data:image/png;base64,AQID",
        "description": "dawn",
    });
    let item: WorkItem = serde_json::from_value(json).unwrap();
    assert_eq!(item.negative_description, "");
    assert!(!item.has_negative());

    let item = item.with_negative("  blurry ");
    assert!(item.has_negative());
}

#[test]
fn test_work_item_rejects_unsupported_image_on_read() {
    let json = serde_json::json!({
        "image": "data:image/webp;base64,AQID",
        "description": "dusk",
    });
    assert!(serde_json::from_value::<WorkItem>(json).is_err());
}
