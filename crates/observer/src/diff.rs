//! Change predicates applied on every tick.

use clipwatch_clipboard::ClipboardImage;

/// A text read is a change when it is non-empty and differs from the last
/// known text. Clearing the clipboard to empty text is never reported.
pub fn text_changed(previous: Option<&str>, current: &str) -> bool {
    !current.is_empty() && previous != Some(current)
}

/// An image read is a change when it is not the empty sentinel and its
/// comparable form differs from the last known image's.
pub fn image_changed(previous: Option<&ClipboardImage>, current: &ClipboardImage) -> bool {
    if current.is_empty() {
        return false;
    }
    let Some(current_form) = current.comparable_form() else {
        return false;
    };
    previous.and_then(ClipboardImage::comparable_form) != Some(current_form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pixel(rgba: [u8; 4]) -> ClipboardImage {
        ClipboardImage::from_rgba(1, 1, rgba.to_vec()).unwrap()
    }

    #[test]
    fn text_diff() {
        assert!(text_changed(Some("A"), "B"));
        assert!(text_changed(Some(""), "B"));
        assert!(text_changed(None, "B"));
        assert!(!text_changed(Some("A"), "A"));
        assert!(!text_changed(Some("A"), ""));
        assert!(!text_changed(None, ""));
    }

    #[test]
    fn text_diff_is_exact() {
        assert!(text_changed(Some("a"), "A"));
        assert!(text_changed(Some("A"), "A "));
    }

    #[test]
    fn image_diff() {
        let red = pixel([255, 0, 0, 255]);
        let blue = pixel([0, 0, 255, 255]);

        assert!(image_changed(Some(&red), &blue));
        assert!(image_changed(None, &blue));
        assert!(image_changed(Some(&ClipboardImage::empty()), &blue));
        assert!(!image_changed(Some(&red), &red.clone()));
        assert!(!image_changed(Some(&red), &ClipboardImage::empty()));
        assert!(!image_changed(None, &ClipboardImage::empty()));
    }

    #[test]
    fn images_from_separate_writes_compare_by_content() {
        let first = pixel([9, 9, 9, 255]);
        let second = pixel([9, 9, 9, 255]);
        assert!(!image_changed(Some(&first), &second));
    }

    // Slot 0 is the empty sentinel; slots 1 and 2 hold identical pixels
    // from separate writes; slot 3 differs.
    fn image_slot(slot: usize) -> (ClipboardImage, Option<[u8; 4]>) {
        match slot {
            0 => (ClipboardImage::empty(), None),
            1 | 2 => (pixel([200, 10, 10, 255]), Some([200, 10, 10, 255])),
            _ => (pixel([10, 10, 200, 255]), Some([10, 10, 200, 255])),
        }
    }

    proptest! {
        #[test]
        fn text_changes_iff_non_empty_and_different(
            previous in proptest::option::of("[ab]{0,2}"),
            current in "[ab]{0,2}",
        ) {
            let expected = !current.is_empty() && previous.as_deref() != Some(current.as_str());
            prop_assert_eq!(text_changed(previous.as_deref(), &current), expected);
        }

        #[test]
        fn image_changes_iff_present_and_content_differs(
            previous in proptest::option::of(0usize..4),
            current in 0usize..4,
        ) {
            let previous = previous.map(image_slot);
            let (current_image, current_content) = image_slot(current);
            let previous_content = previous.as_ref().and_then(|(_, content)| *content);

            let expected = current_content.is_some() && previous_content != current_content;
            prop_assert_eq!(
                image_changed(previous.as_ref().map(|(image, _)| image), &current_image),
                expected
            );
        }
    }
}
