//! CV document projection
//!
//! Pure projection of `CvData` into the page markup tree. Summary and bullet
//! text pass through keyword emphasis; everything else is plain text.

use super::emphasis::emphasize;
use super::markup::{Element, Node};
use crate::models::{CvData, Education, Experience, Labels};

/// Root class of the page element; export looks the node up by it
pub const PAGE_CLASS: &str = "cv-page";

/// Scheme prepended to the LinkedIn and GitHub addresses
pub const EXTERNAL_SCHEME: &str = "https://";

/// Render the full page
pub fn render_document(cv: &CvData, labels: &Labels) -> Node {
    Element::new("article")
        .class(PAGE_CLASS)
        .child(render_header(cv))
        .child(render_summary(cv))
        .child(section(
            "cv-experience",
            &labels.experience,
            Element::new("div")
                .class("cv-entries")
                .children(cv.experience.iter().map(render_experience)),
        ))
        .child(section(
            "cv-education",
            &labels.education,
            Element::new("div")
                .class("cv-entries")
                .children(cv.education.iter().map(render_education)),
        ))
        .child(section("cv-contact", &labels.contact, render_contact(cv, labels)))
        .into()
}

fn render_header(cv: &CvData) -> Element {
    Element::new("header")
        .class("cv-header")
        .child(Element::new("h1").class("cv-name").text(&cv.profile.name))
        .child(Element::new("h2").class("cv-role").text(&cv.profile.role))
}

fn render_summary(cv: &CvData) -> Element {
    Element::new("div").class("cv-summary").children(
        cv.summary_paragraphs()
            .map(|paragraph| Element::new("p").children(emphasize(paragraph)).into()),
    )
}

fn section(class: &str, heading: &str, body: Element) -> Element {
    Element::new("section")
        .class(&format!("cv-section {}", class))
        .child(Element::new("h3").class("cv-section-title").text(heading))
        .child(body)
}

fn render_experience(job: &Experience) -> Node {
    let mut entry = Element::new("div")
        .class("cv-entry")
        .attr("data-id", job.id.as_str())
        .child(
            Element::new("h4")
                .class("cv-entry-title")
                .text(format!("{} | {}", job.company, job.role)),
        )
        .child(Element::new("div").class("cv-period").text(&job.period));

    if !job.bullets.is_empty() {
        entry = entry.child(
            Element::new("ul").class("cv-bullets").children(
                job.bullets
                    .iter()
                    .map(|bullet| Element::new("li").children(emphasize(bullet)).into()),
            ),
        );
    }
    entry.into()
}

fn render_education(edu: &Education) -> Node {
    Element::new("div")
        .class("cv-entry")
        .attr("data-id", edu.id.as_str())
        .child(Element::new("h4").class("cv-entry-title").text(&edu.degree))
        .child(
            Element::new("div")
                .class("cv-institution")
                .text(format!("{} {}", edu.institution, edu.period)),
        )
        .into()
}

fn render_contact(cv: &CvData, labels: &Labels) -> Element {
    let profile = &cv.profile;
    Element::new("div")
        .class("cv-contact-lines")
        .child(contact_line(
            &labels.email,
            Element::new("a")
                .attr("href", format!("mailto:{}", profile.email))
                .text(&profile.email),
        ))
        .child(contact_line(&labels.linkedin, external_link(&profile.linkedin)))
        .child(contact_line(&labels.github, external_link(&profile.github)))
}

fn contact_line(label: &str, link: Element) -> Node {
    Element::new("div")
        .child(Element::new("span").class("cv-contact-label").text(label))
        .text(" ")
        .child(link)
        .into()
}

fn external_link(address: &str) -> Element {
    Element::new("a")
        .attr("href", format!("{}{}", EXTERNAL_SCHEME, address))
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(address)
}

/// Render the page straight to an HTML string
pub fn render_html(cv: &CvData, labels: &Labels) -> String {
    render_document(cv, labels).to_html()
}
