use toasts::toast::ToastView;

const BAR_WIDTH: usize = 20;
const RESET: &str = "\x1b[0m";

/// Text frame of the toast stack, one line per toast.
pub fn frame(views: Option<&[ToastView<'_>]>, color: bool) -> String {
    let Some(views) = views else {
        return "(no toasts)".to_string();
    };
    views
        .iter()
        .map(|view| line(view, color))
        .collect::<Vec<_>>()
        .join("\n")
}

fn line(view: &ToastView<'_>, color: bool) -> String {
    let text = view.title.map_or_else(
        || view.message.to_string(),
        |title| format!("{title}: {}", view.message),
    );
    let head = format!("{} {:<8}", view.style.glyph, view.style.label);
    let head = if color {
        format!("{}{head}{RESET}", view.style.ansi_fg())
    } else {
        head
    };
    let suffix = if view.visible { "" } else { " (closing)" };
    format!(
        "{head} {text} [{}] {:>3}%{suffix}",
        bar(view.progress),
        percent(view.progress)
    )
}

fn bar(progress: f32) -> String {
    let filled = filled_cells(progress);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn filled_cells(progress: f32) -> usize {
    ((progress.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f32).round() as usize
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(progress: f32) -> u32 {
    progress.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::frame;
    use toasts::style::ToastStyle;
    use toasts::toast::ToastView;
    use toasts::types::{NotificationId, NotificationKind};

    fn view<'a>(
        id: &'a NotificationId,
        kind: NotificationKind,
        title: Option<&'a str>,
        message: &'a str,
        progress: f32,
        visible: bool,
    ) -> ToastView<'a> {
        ToastView {
            id,
            kind,
            title,
            message,
            progress,
            visible,
            style: ToastStyle::for_kind(kind),
        }
    }

    #[test]
    fn renders_stack_without_color() {
        let error_id = NotificationId::from("n1");
        let success_id = NotificationId::from("n2");
        let views = [
            view(&error_id, NotificationKind::Error, None, "Network failed", 50.0, true),
            view(&success_id, NotificationKind::Success, Some("Upload"), "done", 100.0, false),
        ];
        insta::assert_snapshot!(frame(Some(&views), false), @r"
        ✕ ERROR    Network failed [##########----------]  50%
        ✓ SUCCESS  Upload: done [####################] 100% (closing)
        ");
    }

    #[test]
    fn empty_stack_has_placeholder() {
        assert_eq!(frame(None, true), "(no toasts)");
    }

    #[test]
    fn color_wraps_the_label() {
        let id = NotificationId::from("n1");
        let views = [view(&id, NotificationKind::Error, None, "x", 0.0, true)];
        let out = frame(Some(&views), true);
        assert!(out.starts_with("\x1b[38;2;239;68;68m✕ ERROR   \x1b[0m x ["));
        assert!(out.ends_with("[--------------------]   0%"));
    }
}
