use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use search_bar::{FetchState, ResultsView, SearchItem, SearchSession, Segment, highlight_title};

/// View model for the results list - all presentation data pre-computed
#[derive(Debug, Clone)]
pub struct ResultsViewModel {
    /// Header line with the dialog title and result count
    pub header: String,
    pub rows: Vec<ResultRow>,
}

/// A single row in the results list
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRow {
    /// Skeleton row shown while a search is in flight
    Placeholder,
    Item {
        /// Title with highlighted spans underlined
        title: Line<'static>,
        /// Group text with brackets: "[Group]"
        group: Option<String>,
        subtitle: Option<String>,
        /// Identifier of the selected entry
        id: String,
    },
}

/// Styles used for highlighted and plain title text
#[derive(Debug, Clone, Copy)]
pub struct TitleStyle {
    pub text: Style,
    pub highlight: Style,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            highlight: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::UNDERLINED),
        }
    }
}

/// Turn highlight segments into a styled line
pub fn title_line(segments: &[Segment<'_>], style: TitleStyle) -> Line<'static> {
    let spans: Vec<Span<'static>> = segments
        .iter()
        .map(|segment| match segment {
            Segment::Text(text) => Span::styled(text.to_string(), style.text),
            Segment::Highlight(text) => Span::styled(text.to_string(), style.highlight),
        })
        .collect();
    Line::from(spans)
}

impl ResultsViewModel {
    /// Build view model from the fetcher state
    pub fn from_state(
        title: &str,
        state: &FetchState<SearchItem<String>>,
        session: Option<&SearchSession>,
        style: TitleStyle,
    ) -> Self {
        let view = state.view(|item| ResultRow::Item {
            title: title_line(&highlight_title(session, &item.title), style),
            group: item.group.as_ref().map(|group| format!("[{}]", group)),
            subtitle: item.subtitle.clone(),
            id: item.value.clone(),
        });

        let (header, rows) = match view {
            ResultsView::Hidden => (format!("{} (no results)", title), Vec::new()),
            ResultsView::Loading { placeholders } => (
                format!("{} (searching...)", title),
                vec![ResultRow::Placeholder; placeholders],
            ),
            ResultsView::Items(rows) => (format!("{} ({} results)", title, rows.len()), rows),
        };

        Self { header, rows }
    }
}

impl ResultRow {
    /// Plain-text rendering, highlighted spans wrapped in `open`/`close`
    pub fn to_plain(&self, style: TitleStyle, open: &str, close: &str) -> String {
        match self {
            ResultRow::Placeholder => "  ░░░░░░░░░░░░".to_string(),
            ResultRow::Item {
                title,
                group,
                subtitle,
                id,
            } => {
                let mut out = String::from("  ");
                for span in &title.spans {
                    if span.style == style.highlight {
                        out.push_str(open);
                        out.push_str(&span.content);
                        out.push_str(close);
                    } else {
                        out.push_str(&span.content);
                    }
                }
                if let Some(group) = group {
                    out.push(' ');
                    out.push_str(group);
                }
                if let Some(subtitle) = subtitle {
                    out.push_str("\n    ");
                    out.push_str(subtitle);
                }
                if id != &plain_title(title) {
                    out.push_str(&format!("\n    -> {}", id));
                }
                out
            }
        }
    }
}

fn plain_title(title: &Line<'_>) -> String {
    title.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> SearchItem<String> {
        SearchItem::new(title, title.to_string()).with_group("File")
    }

    #[test]
    fn test_title_line_styles_highlights() {
        let style = TitleStyle::default();
        let line = title_line(
            &[Segment::Highlight("Sav"), Segment::Text("e File")],
            style,
        );

        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].style, style.highlight);
        assert_eq!(line.spans[1].content, "e File");
    }

    #[test]
    fn test_loading_state_has_three_placeholders() {
        let mut state = FetchState::default();
        state.begin("file");

        let vm = ResultsViewModel::from_state("Command Palette", &state, None, TitleStyle::default());
        assert_eq!(vm.rows, vec![ResultRow::Placeholder; 3]);
        assert_eq!(vm.header, "Command Palette (searching...)");
    }

    #[test]
    fn test_settled_rows() {
        let mut state = FetchState::default();
        let ticket = state.begin("file").unwrap();
        state.settle(&ticket, Ok(vec![item("Open File"), item("Save File")]));

        let style = TitleStyle::default();
        let vm = ResultsViewModel::from_state("Command Palette", &state, None, style);
        assert_eq!(vm.header, "Command Palette (2 results)");
        assert_eq!(vm.rows[0].to_plain(style, "[", "]"), "  Open File [File]");
    }

    #[test]
    fn test_plain_output_marks_highlights() {
        let style = TitleStyle::default();
        let row = ResultRow::Item {
            title: title_line(
                &[Segment::Highlight("Searc"), Segment::Text("h "), Segment::Highlight("Bar")],
                style,
            ),
            group: None,
            subtitle: Some("Find anything".into()),
            id: "search.open".into(),
        };

        assert_eq!(
            row.to_plain(style, "<", ">"),
            "  <Searc>h <Bar>\n    Find anything\n    -> search.open"
        );
    }
}
