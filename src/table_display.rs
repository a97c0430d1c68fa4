use crate::data::application::ApplicationId;
use crate::data::table_view::{Column, PageView};
use crate::state::edit_surface::{Draft, EditMode};
use comfy_table::{Attribute, Cell, ContentArrangement, Table};

/// Marker pair for selected / unselected rows
fn selection_markers(use_glyphs: bool) -> (&'static str, &'static str) {
    if use_glyphs {
        ("☑", "☐")
    } else {
        ("[x]", "[ ]")
    }
}

/// Render one page of applications followed by the paginator report
pub fn render_page<F>(page: &PageView, is_selected: F, use_glyphs: bool) -> String
where
    F: Fn(&ApplicationId) -> bool,
{
    let (on, off) = selection_markers(use_glyphs);
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers = vec![
        Cell::new(""),
        Cell::new("Id").add_attribute(Attribute::Bold),
    ];
    headers.extend(
        Column::ALL
            .iter()
            .map(|c| Cell::new(c.header()).add_attribute(Attribute::Bold)),
    );
    table.set_header(headers);

    for app in &page.rows {
        let marker = match &app.id {
            Some(id) if is_selected(id) => on,
            _ => off,
        };
        let id = app.id.as_ref().map(|id| id.to_string()).unwrap_or_default();

        let mut row = vec![marker.to_string(), id];
        row.extend(Column::ALL.iter().map(|c| c.display(app)));
        table.add_row(row);
    }

    let mut out = table.to_string();
    out.push('\n');
    out.push_str(&format!(
        "{}  (page {}/{})",
        page.report(),
        page.page + 1,
        page.page_count
    ));
    out
}

/// Render the open draft with inline field errors
pub fn render_draft(draft: &Draft, mode: EditMode) -> String {
    let title = match mode {
        EditMode::Create => "Configuración de Despliegue (nueva)",
        EditMode::Edit => "Configuración de Despliegue",
    };
    let errors = draft.visible_errors();
    let app = &draft.application;

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
    ]);

    let type_note = if errors.type_missing {
        "Tipo de Aplicación es requerido."
    } else {
        app.type_label()
    };
    let name_note = if errors.name_missing {
        "Nombre es requerido."
    } else {
        ""
    };

    table.add_row(vec![Column::Type.header(), app.type_code.as_str(), type_note]);
    table.add_row(vec![Column::Name.header(), app.name.as_str(), name_note]);
    table.add_row(vec![Column::Path.header(), app.path.as_str(), ""]);

    table.to_string()
}
