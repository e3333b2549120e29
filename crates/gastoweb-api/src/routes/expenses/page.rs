//! Expense screen rendering - Full page and the fragments it is built from
//!
//! The screen is made of swappable slots: the form toggle button, the form,
//! the list (table plus pager), the modal and the toast. Handlers return the
//! slot they target and pass the others along out-of-band when they change.

use crate::routes::toast::render_book_toast;
use crate::{page_response, slot, AppState};
use gastoweb_config::CurrencyConfig;
use gastoweb_core::{Draft, ExpenseBook, ExpenseRecord, Medio, PageView, QueryState, SortDir, SortKey, UiMode};
use gastoweb_utils::{escape_html, format_currency, stars, truncate_chars};

// ==================== Form ====================

/// "Nuevo gasto" / "Cerrar formulario" button
pub fn render_toggle_button(mode: UiMode, oob: bool) -> String {
    let label = if mode.is_form_open() { "Cerrar formulario" } else { "Nuevo gasto" };
    slot(
        "form-toggle",
        oob,
        "class='flex justify-center'",
        &format!(
            "<button class='px-6 py-3 bg-indigo-600 text-white text-lg rounded-lg hover:bg-indigo-700' hx-get='/expenses/form/toggle' hx-target='#form-slot' hx-swap='outerHTML'>{}</button>",
            label
        ),
    )
}

fn field_help(error: Option<&str>, fallback: &str) -> String {
    match error {
        Some(message) => format!("<p class='text-xs text-red-600 mt-1'>{}</p>", message),
        None => format!("<p class='text-xs text-gray-500 mt-1'>{}</p>", fallback),
    }
}

fn input_class(error: Option<&str>) -> &'static str {
    if error.is_some() {
        "w-full px-3 py-2 border border-red-400 rounded-lg bg-red-50"
    } else {
        "w-full px-3 py-2 border rounded-lg"
    }
}

/// Create/edit form, or an empty slot when the form is closed
pub fn render_form_slot(mode: UiMode, draft: &Draft, oob: bool) -> String {
    if !mode.is_form_open() {
        return slot("form-slot", oob, "", "");
    }

    let errors = draft.field_errors();
    let medio_options: String = Medio::ALL
        .iter()
        .map(|m| {
            format!(
                "<option value='{}'{}>{}</option>",
                escape_html(m.label()),
                if draft.medio == Some(*m) { " selected" } else { "" },
                m.label()
            )
        })
        .collect();
    let submit_label = if mode.editing_id().is_some() { "Actualizar" } else { "Guardar" };
    let rating_hint = stars(draft.calificacion);

    let inner = format!(
        r#"<form hx-post='/expenses' hx-target='#form-slot' hx-swap='outerHTML' class='bg-white rounded-xl shadow-sm p-6 mb-4'>
    <fieldset class='grid grid-cols-1 md:grid-cols-4 gap-4'>
        <div>
            <label for='medio' class='block text-sm font-medium mb-1'>Medio</label>
            <select id='medio' name='medio' class='w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
        </div>
        <div class='md:col-span-2'>
            <label for='anotaciones' class='block text-sm font-medium mb-1'>Anotaciones</label>
            <input id='anotaciones' name='anotaciones' value='{}' placeholder='Ej: viaje al trabajo' class='w-full px-3 py-2 border rounded-lg'>
        </div>
        <div>
            <label for='zona' class='block text-sm font-medium mb-1'>Zona</label>
            <input id='zona' name='zona' value='{}' placeholder='Barrio o zona' class='w-full px-3 py-2 border rounded-lg'>
        </div>
        <div>
            <label for='tiempoDemora' class='block text-sm font-medium mb-1'>Demora (min)</label>
            <input id='tiempoDemora' name='tiempoDemora' type='number' min='0' value='{}' class='{}'>
            {}
        </div>
        <div>
            <label for='gasto' class='block text-sm font-medium mb-1'>Gasto ($)</label>
            <input id='gasto' name='gasto' type='number' step='0.01' min='0' inputmode='decimal' value='{}' required class='{}'>
            {}
        </div>
        <div>
            <label for='calificacion' class='block text-sm font-medium mb-1'>Calificación (1–5)</label>
            <input id='calificacion' name='calificacion' type='number' min='1' max='5' value='{}' class='{}'>
            {}
        </div>
    </fieldset>
    <div class='mt-4 flex gap-2'>
        <button type='submit' class='px-4 py-2 bg-green-600 text-white rounded-lg hover:bg-green-700'>✓ {}</button>
        <button type='button' hx-post='/expenses/form/reset' hx-target='#form-slot' hx-swap='outerHTML' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Limpiar</button>
    </div>
    <p class='text-xs text-gray-500 mt-2'>Los cambios se guardan al presionar <b>{}</b>.</p>
</form>"#,
        medio_options,
        escape_html(&draft.anotaciones),
        escape_html(&draft.zona),
        draft.tiempo_demora,
        input_class(errors.tiempo_demora),
        field_help(errors.tiempo_demora, "Minutos de viaje."),
        draft.gasto,
        input_class(errors.gasto),
        field_help(errors.gasto, "Ingresá el monto del viaje."),
        draft.calificacion,
        input_class(errors.calificacion),
        field_help(errors.calificacion, &rating_hint),
        submit_label,
        submit_label
    );

    slot("form-slot", oob, "", &inner)
}

// ==================== List ====================

fn sort_header(label: &str, key: SortKey, query: &QueryState) -> String {
    let (dir, marker) = if query.sort_key == key {
        match query.sort_dir {
            SortDir::Asc => (SortDir::Desc, " ▲"),
            SortDir::Desc => (SortDir::Asc, " ▼"),
        }
    } else {
        (SortDir::Desc, "")
    };
    format!(
        "<th class='px-4 py-2 text-left'><a href='#' hx-get='/expenses/list?sort={}&dir={}' hx-target='#expense-list' hx-swap='outerHTML' class='hover:underline'>{}{}</a></th>",
        key, dir, label, marker
    )
}

fn render_row(record: &ExpenseRecord, currency: &CurrencyConfig) -> String {
    format!(
        r#"<tr class='border-t hover:bg-gray-50'>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2' title='{}'>{}</td>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2'>{} min</td>
    <td class='px-4 py-2 text-right'>{}</td>
    <td class='px-4 py-2' title='{}/5'>{}</td>
    <td class='px-4 py-2'>{}</td>
    <td class='px-4 py-2 whitespace-nowrap'>
        <button class='px-2 py-1 text-sm border border-indigo-300 text-indigo-600 rounded hover:bg-indigo-50' aria-label='Editar registro'
            hx-get='/expenses/{}/edit' hx-target='#form-slot' hx-swap='outerHTML'>✎</button>
        <button class='px-2 py-1 text-sm border border-red-300 text-red-600 rounded hover:bg-red-50' aria-label='Eliminar registro'
            hx-post='/expenses/{}/delete' hx-target='#modal-slot' hx-swap='outerHTML'>🗑</button>
    </td>
</tr>"#,
        record.medio,
        escape_html(&record.anotaciones),
        escape_html(&truncate_chars(&record.anotaciones, 40)),
        escape_html(&record.zona),
        record.tiempo_demora,
        format_currency(record.gasto, &currency.symbol, currency.decimal_places),
        record.calificacion,
        stars(record.calificacion as i64),
        record.creado_el.format("%d/%m/%Y"),
        record.id,
        record.id
    )
}

/// Table and pager for `view`
pub fn render_list(view: &PageView, query: &QueryState, page_sizes: &[usize], currency: &CurrencyConfig, oob: bool) -> String {
    let rows: String = if view.items.is_empty() {
        let message = if query.text.trim().is_empty() {
            "Todavía no cargaste gastos.".to_string()
        } else {
            format!("No encontramos resultados para “{}”.", escape_html(query.text.trim()))
        };
        format!(
            "<tr><td colspan='8' class='text-center text-gray-500 py-6'>{} <button class='ml-1 px-2 py-1 text-sm bg-indigo-600 text-white rounded' hx-get='/expenses/form/new' hx-target='#form-slot' hx-swap='outerHTML'>Cargar primer gasto</button></td></tr>",
            message
        )
    } else {
        view.items.iter().map(|r| render_row(r, currency)).collect()
    };

    let shown = if view.total_count == 0 {
        "0".to_string()
    } else {
        format!("{}-{}", view.start_index, view.end_index)
    };
    let prev_disabled = if view.page <= 1 { " disabled" } else { "" };
    let next_disabled = if view.page >= view.total_pages { " disabled" } else { "" };
    let size_options: String = page_sizes
        .iter()
        .map(|n| format!("<option value='{}'{}>{}</option>", n, if *n == view.page_size { " selected" } else { "" }, n))
        .collect();

    let inner = format!(
        r#"<div class='bg-white rounded-xl shadow-sm overflow-x-auto'>
    <table class='w-full text-sm'>
        <thead class='bg-gray-50'>
            <tr>{}<th class='px-4 py-2 text-left'>Anotaciones</th>{}{}{}{}{}<th class='px-4 py-2 text-left'>Acciones</th></tr>
        </thead>
        <tbody>{}</tbody>
    </table>
</div>
<div class='grid grid-cols-1 md:grid-cols-3 items-center gap-2 mt-3'>
    <div class='hidden md:block'></div>
    <div class='flex justify-center items-center gap-3'>
        <button class='px-3 py-1.5 border rounded-lg disabled:opacity-50' hx-get='/expenses/list?nav=prev' hx-target='#expense-list' hx-swap='outerHTML'{}>« Prev</button>
        <span class='text-gray-500 text-sm'>Página {} de {} · Mostrando {} de {}</span>
        <button class='px-3 py-1.5 border rounded-lg disabled:opacity-50' hx-get='/expenses/list?nav=next' hx-target='#expense-list' hx-swap='outerHTML'{}>Next »</button>
    </div>
    <div class='flex justify-center md:justify-end items-center gap-2'>
        <label for='rpp' class='text-sm'>Filas</label>
        <select id='rpp' name='limit' class='px-2 py-1 border rounded-lg bg-white' hx-get='/expenses/list' hx-trigger='change' hx-target='#expense-list' hx-swap='outerHTML'>{}</select>
    </div>
</div>"#,
        sort_header("Medio", SortKey::Medio, query),
        sort_header("Zona", SortKey::Zona, query),
        sort_header("Demora", SortKey::TiempoDemora, query),
        sort_header("Gasto", SortKey::Gasto, query),
        sort_header("Calif.", SortKey::Calificacion, query),
        sort_header("Fecha", SortKey::CreadoEl, query),
        rows,
        prev_disabled,
        view.page,
        view.total_pages,
        shown,
        view.total_count,
        next_disabled,
        size_options
    );

    slot("expense-list", oob, "", &inner)
}

/// List slot for the book's current query
pub fn render_book_list(book: &ExpenseBook, currency: &CurrencyConfig, oob: bool) -> String {
    render_list(&book.visible_page(), book.query(), book.page_size_options(), currency, oob)
}

// ==================== Modal ====================

fn modal(title: &str, body: &str, footer: &str, close_attrs: &str) -> String {
    format!(
        r#"<div class='fixed inset-0 bg-black/40 z-40'></div>
<div class='fixed inset-0 z-50 flex items-center justify-center p-4' role='dialog' aria-modal='true' aria-labelledby='modal-title'>
    <div class='bg-white rounded-xl shadow-xl w-full max-w-lg'>
        <div class='flex items-center justify-between px-5 py-3 border-b'>
            <h5 id='modal-title' class='font-semibold'>{}</h5>
            <button class='text-gray-400 hover:text-gray-600' aria-label='Cerrar' {}>✕</button>
        </div>
        <div class='px-5 py-4'>{}</div>
        <div class='flex justify-end gap-2 px-5 py-3 border-t'>{}</div>
    </div>
</div>"#,
        title, close_attrs, body, footer
    )
}

fn help_body() -> &'static str {
    r#"<ul class='list-disc pl-5 space-y-1'>
    <li><b>Nuevo gasto:</b> el botón centrado arriba abre el formulario.</li>
    <li><b>Búsqueda:</b> en la barra de controles; ignora mayúsculas y tildes.</li>
    <li><b>Orden:</b> elegí campo y dirección, o hacé click en el encabezado de la tabla.</li>
    <li><b>Borrado:</b> solo individual, con confirmación.</li>
</ul>"#
}

/// Help or delete confirmation, depending on the mode
pub fn render_modal_slot(mode: UiMode, book: &ExpenseBook, oob: bool) -> String {
    match mode {
        UiMode::Help => {
            let close = "hx-post='/help/close' hx-target='#modal-slot' hx-swap='outerHTML'";
            let footer = format!(
                "<button class='px-4 py-2 bg-indigo-600 text-white rounded-lg' {}>Entendido</button>",
                close
            );
            slot("modal-slot", oob, "", &modal("Ayuda", help_body(), &footer, close))
        }
        UiMode::ConfirmDelete { id } => {
            let cancel = "hx-post='/confirm/cancel' hx-target='#modal-slot' hx-swap='outerHTML'";
            let detail = book
                .record(id)
                .map(|r| format!("<p class='text-sm text-gray-500 mt-2'>{} · {} · {}</p>", r.medio, escape_html(&r.zona), r.creado_el.format("%d/%m/%Y")))
                .unwrap_or_default();
            let body = format!("<p>¿Seguro que querés eliminar este registro?</p>{}", detail);
            let footer = format!(
                "<button class='px-4 py-2 border rounded-lg hover:bg-gray-50' {}>Cancelar</button><button class='px-4 py-2 bg-red-600 text-white rounded-lg hover:bg-red-700' hx-post='/confirm' hx-target='#modal-slot' hx-swap='outerHTML'>Sí, borrar</button>",
                cancel
            );
            slot("modal-slot", oob, "", &modal("Eliminar registro", &body, &footer, cancel))
        }
        _ => slot(
            "modal-slot",
            oob,
            "",
            "<script>if (window.location.hash === '#help') history.replaceState(null, '', window.location.pathname);</script>",
        ),
    }
}

// ==================== Page ====================

fn render_controls(query: &QueryState) -> String {
    let key_options: String = SortKey::ALL
        .iter()
        .map(|k| format!("<option value='{}'{}>{}</option>", k, if *k == query.sort_key { " selected" } else { "" }, k.label()))
        .collect();
    let dir_option = |dir: SortDir, label: &str| {
        format!("<option value='{}'{}>{}</option>", dir, if dir == query.sort_dir { " selected" } else { "" }, label)
    };

    format!(
        r#"<section class='grid grid-cols-1 lg:grid-cols-2 gap-3 items-end mb-4'>
    <form class='grid grid-cols-2 gap-2' hx-get='/expenses/list' hx-trigger='change' hx-target='#expense-list' hx-swap='outerHTML'>
        <div>
            <label for='orderBy' class='block text-sm mb-1'>Ordenar por</label>
            <select id='orderBy' name='sort' class='w-full px-3 py-2 border rounded-lg bg-white'>{}</select>
        </div>
        <div>
            <label for='orderDir' class='block text-sm mb-1'>Dirección</label>
            <select id='orderDir' name='dir' class='w-full px-3 py-2 border rounded-lg bg-white'>{}{}</select>
        </div>
    </form>
    <div>
        <label for='search' class='block text-sm mb-1'>Buscar</label>
        <input id='search' name='q' type='search' value='{}' placeholder='(medio, anotaciones, zona)'
            class='w-full px-3 py-2 border rounded-lg bg-gray-100 focus:bg-white'
            hx-get='/expenses/search' hx-trigger='input, search' hx-target='#expense-list' hx-swap='outerHTML'>
    </div>
</section>"#,
        key_options,
        dir_option(SortDir::Asc, "Ascendente"),
        dir_option(SortDir::Desc, "Descendente"),
        escape_html(&query.text)
    )
}

/// Main screen (`/app`)
pub async fn page_app(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let mut book = state.book.write().await;
    let mode = book.mode();
    let toast = render_book_toast(&mut book, false);

    let inner_content = format!(
        r#"<section class='text-center mb-6'>
    <h1 class='text-3xl font-semibold mb-1'>Gastos de Transporte</h1>
    <p class='text-gray-500 mb-4'>Registra viajes y gastos de forma simple.</p>
    {}
</section>
{}
{}
{}
{}
{}
<script>
    if (window.location.hash === '#help') {{
        htmx.ajax('GET', '/help', {{ target: '#modal-slot', swap: 'outerHTML' }});
    }}
</script>"#,
        render_toggle_button(mode, false),
        render_controls(book.query()),
        render_form_slot(mode, book.draft(), false),
        render_book_list(&book, &state.config.currency, false),
        render_modal_slot(mode, &book, false),
        toast
    );

    axum::response::Html(page_response(&headers, "Gastos", &inner_content))
}
