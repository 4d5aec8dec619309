/// Values substituted into the instance templates.
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    pub loader_version: &'a str,
    pub minecraft_version: &'a str,
    pub lwjgl_version: &'a str,
}

impl<'a> Placeholders<'a> {
    fn is_lwjgl3(&self) -> bool {
        self.lwjgl_version.starts_with('3')
    }

    pub fn lwjgl_name(&self) -> &'static str {
        if self.is_lwjgl3() { "LWJGL 3" } else { "LWJGL 2" }
    }

    pub fn lwjgl_uid(&self) -> &'static str {
        if self.is_lwjgl3() { "org.lwjgl3" } else { "org.lwjgl" }
    }

    /// Replaces every known `${name}` token. Unknown tokens are left as they are.
    pub fn apply(&self, subject: &str) -> String {
        [
            ("${loader_version}", self.loader_version),
            ("${minecraft_version}", self.minecraft_version),
            ("${lwjgl_version}", self.lwjgl_version),
            ("${lwjgl_name}", self.lwjgl_name()),
            ("${lwjgl_uid}", self.lwjgl_uid()),
        ]
        .into_iter()
        .fold(subject.to_owned(), |text, (token, value)| {
            text.replace(token, value)
        })
    }
}
