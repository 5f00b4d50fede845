//! Standard template tags available to notification content.

use forms_elements::ElementTypeRegistry;
use forms_model::{Form, Submission};
use forms_tags::{TagArg, TagArgKind, TagHandler};

fn with_form_and_submission<'a>(args: &'a [TagArg<'_>]) -> Option<(&'a Form, &'a Submission)> {
    match (args.first(), args.get(1)) {
        (Some(TagArg::Form(form)), Some(TagArg::Submission(submission))) => {
            Some((form, submission))
        }
        _ => None,
    }
}

/// Build the `(Form, Submission)` tag handler used by notifications.
///
/// `site_title` is captured at construction; `registry` drives the value
/// formatting of the `allvalues` table, which is only rendered when the tag
/// is literally present in the content.
pub fn standard_tags(site_title: &str, registry: &'static ElementTypeRegistry) -> TagHandler {
    let mut handler = TagHandler::new(vec![TagArgKind::Form, TagArgKind::Submission]);
    let site_title = site_title.to_string();

    handler
        .register("sitetitle", "site", "Title of the site", move |_| {
            site_title.clone()
        })
        .expect("valid tag name");
    handler
        .register("formtitle", "form", "Title of the form", |args| {
            with_form_and_submission(args).map_or_else(String::new, |(form, _)| form.title.clone())
        })
        .expect("valid tag name");
    handler
        .register("formid", "form", "Numeric id of the form", |args| {
            with_form_and_submission(args)
                .map_or_else(String::new, |(form, _)| form.id.to_string())
        })
        .expect("valid tag name");
    handler
        .register("submissionid", "form", "Numeric id of the submission", |args| {
            with_form_and_submission(args)
                .map_or_else(String::new, |(_, submission)| submission.id.to_string())
        })
        .expect("valid tag name");
    handler
        .register(
            "submissiondate",
            "form",
            "Completion date of the submission",
            |args| {
                with_form_and_submission(args).map_or_else(String::new, |(_, submission)| {
                    submission
                        .completed_at
                        .unwrap_or(submission.created_at)
                        .format("%Y-%m-%d %H:%M:%S UTC")
                        .to_string()
                })
            },
        )
        .expect("valid tag name");
    handler
        .register(
            "allvalues",
            "form",
            "Table of every element label and submitted value",
            move |args| {
                let Some((form, submission)) = with_form_and_submission(args) else {
                    return String::new();
                };
                let mut lines = Vec::new();
                for element in form.elements() {
                    let element_type = registry.get(&element.type_slug);
                    if !element_type.is_input() {
                        continue;
                    }
                    let value = submission.values.get(&element.id);
                    let rendered = value
                        .map(|value| element_type.format_display(value, element))
                        .unwrap_or_default();
                    lines.push(format!("{}: {}", element.label, rendered));
                }
                lines.join("<br>\n")
            },
        )
        .expect("valid tag name");

    handler
}
