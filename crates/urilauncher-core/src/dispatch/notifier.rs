//! User-visible alerts.

/// Trait for surfacing a message to the user.
pub trait Notifier {
    fn alert(&self, title: &str, message: &str);
}

/// Prints to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}

/// Modal `MessageBoxW`, for runs without a console.
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageBoxNotifier;

#[cfg(target_os = "windows")]
impl Notifier for MessageBoxNotifier {
    fn alert(&self, title: &str, message: &str) {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{MB_ICONERROR, MB_OK, MessageBoxW};
        use windows::core::HSTRING;

        let text = HSTRING::from(message);
        let caption = HSTRING::from(title);
        // SAFETY: MessageBoxW blocks until dismissed; both strings outlive the call.
        unsafe {
            MessageBoxW(HWND::default(), &text, &caption, MB_OK | MB_ICONERROR);
        }
    }
}

/// Message box when stderr is not a terminal, console otherwise.
pub fn default_notifier() -> Box<dyn Notifier> {
    #[cfg(target_os = "windows")]
    {
        use std::io::IsTerminal;
        if !std::io::stderr().is_terminal() {
            return Box::new(MessageBoxNotifier);
        }
    }
    Box::new(ConsoleNotifier)
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn alert(&self, title: &str, message: &str) {
        (**self).alert(title, message)
    }
}
