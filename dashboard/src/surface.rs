use crate::view::PageView;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error};

/// Seam between the orchestrator and whatever hosts the page shell.
///
/// Both methods fully replace the previous content of their region; nothing
/// is ever appended, so stale control bindings cannot survive a cycle.
pub trait Regions {
    /// Replaces all four display regions with one projected snapshot.
    fn render(&mut self, view: &PageView);

    /// Replaces the add-device form's notice area.
    fn set_add_notice(&mut self, markup: String);
}

/// Writes the dashboard as one self-contained HTML page on every change.
/// Stands in for the browser page shell, which is out of scope here.
pub struct HtmlFileRegions {
    path: PathBuf,
    view: PageView,
    notice: String,
}

impl HtmlFileRegions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            view: PageView::default(),
            notice: String::new(),
        }
    }

    fn write_page(&self) -> io::Result<()> {
        std::fs::write(&self.path, self.page())
    }

    fn page(&self) -> String {
        format!(
            concat!(
                "<!doctype html>\n",
                "<html lang=\"en\">\n",
                "<head><meta charset=\"utf-8\"><title>Smart Home Dashboard</title></head>\n",
                "<body>\n",
                "<div id=\"addDeviceMessage\">{notice}</div>\n",
                "<h2>Lighting</h2>\n",
                "<div id=\"lights-container\" class=\"row\">{lighting}</div>\n",
                "<h2>Locks</h2>\n",
                "<div id=\"locks-container\" class=\"row\">{locks}</div>\n",
                "<h2>Irrigation</h2>\n",
                "<div id=\"irrigation-container\" class=\"row\">{irrigation}</div>\n",
                "<h2>Recently updated</h2>\n",
                "<table class=\"table\">",
                "<thead><tr><th>Name</th><th>Type</th><th>Status</th><th>Location</th><th>Last update</th></tr></thead>",
                "<tbody id=\"recentDevicesTableBody\">{recent}</tbody>",
                "</table>\n",
                "</body>\n",
                "</html>\n",
            ),
            notice = self.notice,
            lighting = self.view.lighting,
            locks = self.view.locks,
            irrigation = self.view.irrigation,
            recent = self.view.recent,
        )
    }
}

impl Regions for HtmlFileRegions {
    fn render(&mut self, view: &PageView) {
        self.view = view.clone();
        match self.write_page() {
            Ok(()) => debug!("Wrote dashboard page to {}", self.path.display()),
            Err(e) => error!("Failed to write dashboard page: {}", e),
        }
    }

    fn set_add_notice(&mut self, markup: String) {
        self.notice = markup;
        if let Err(e) = self.write_page() {
            error!("Failed to write dashboard page: {}", e);
        }
    }
}
