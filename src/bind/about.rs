//! About page: profile hero, bio, skills, timelines and projects.
//!
//! Every section is optional. A missing section leaves its slot untouched;
//! missing fields inside a record render fallback text.

use super::{or_fallback, BindContext};
use crate::model::{AboutProfile, Education, Experience, PersonalInfo, Project, Skill, SocialLinks};
use crate::placeholder;
use crate::render::{El, View};
use crate::Result;

pub const PAGE_SLOT: &str = "#sobre-principal";
pub const PROFILE_FAILED: &str = "Erro ao carregar informações pessoais";

/// CSS class suffix for a status label: lowercased, `ç` folded to `c`,
/// whitespace runs joined with `-`
pub fn status_slug(status: &str) -> String {
    status
        .to_lowercase()
        .replace('ç', "c")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn status_badge(class: &str, status: &str) -> El {
    let (slug, label) = if status.trim().is_empty() {
        ("concluido".to_string(), "Concluído".to_string())
    } else {
        (status_slug(status), status.to_string())
    };
    El::new("span")
        .class(class)
        .class(&format!("status-{}", slug))
        .text(label)
}

fn tech_tags(technologies: &[String]) -> impl Iterator<Item = El> + '_ {
    technologies
        .iter()
        .map(|tech| El::new("span").class("tech-tag").text(tech.as_str()))
}

pub fn avatar(info: &PersonalInfo) -> View {
    El::new("div").class("avatar").text(info.avatar.as_str()).into()
}

pub fn social_links(links: &SocialLinks) -> Vec<View> {
    let link = |href: String, icon: &str, label: &str, external: bool| -> View {
        El::new("a")
            .attr("href", href)
            .class("social-link")
            .attr_if(external, "target", "_blank")
            .child(El::new("span").class("social-icon").text(icon))
            .text(format!(" {}", label))
            .into()
    };
    vec![
        link(links.github.clone(), "💻", "GitHub", true),
        link(links.linkedin.clone(), "💼", "LinkedIn", true),
        link(links.instagram.clone(), "📷", "Instagram", true),
        link(format!("mailto:{}", links.email), "📧", "Email", false),
    ]
}

pub fn bio(info: &PersonalInfo) -> View {
    El::new("div")
        .class("bio-text")
        .child(El::new("p").text(or_fallback(&info.bio, "Informações não disponíveis")))
        .child(El::new("p").text(or_fallback(&info.description, "Descrição não disponível")))
        .child(
            El::new("div")
                .class("objective")
                .child(El::new("h4").text("Objetivo Profissional"))
                .child(El::new("p").text(or_fallback(&info.objective, "Objetivo não disponível"))),
        )
        .into()
}

/// Skills grouped by category, categories in order of first appearance
pub fn skill_groups(skills: &[Skill]) -> Vec<(&str, Vec<&Skill>)> {
    let mut groups: Vec<(&str, Vec<&Skill>)> = Vec::new();
    for skill in skills {
        match groups.iter_mut().find(|(c, _)| *c == skill.category) {
            Some((_, members)) => members.push(skill),
            None => groups.push((skill.category.as_str(), vec![skill])),
        }
    }
    groups
}

pub fn skills(skills: &[Skill]) -> Vec<View> {
    skill_groups(skills)
        .into_iter()
        .map(|(category, members)| {
            El::new("div")
                .class("skill-category")
                .child(El::new("h3").text(category))
                .child(El::new("div").class("skill-items").children(members.into_iter().map(skill_item)))
                .into()
        })
        .collect()
}

fn skill_item(skill: &Skill) -> El {
    El::new("div")
        .class("skill-item")
        .child(
            El::new("div")
                .class("skill-header")
                .child(El::new("span").class("skill-name").text(or_fallback(&skill.name, "N/A")))
                .child(El::new("span").class("skill-level").text(format!("{}%", skill.level))),
        )
        .child(
            El::new("div").class("skill-bar").child(
                El::new("div")
                    .class("skill-progress")
                    .attr("style", format!("width: {}%", skill.level)),
            ),
        )
}

/// `2020 - 2023`, or `2024 - Atual` while ongoing
pub fn education_period(edu: &Education) -> String {
    let start = edu
        .start_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    match edu.end_year {
        Some(end) => format!("{} - {}", start, end),
        None => format!("{} - Atual", start),
    }
}

pub fn education(items: &[Education]) -> Vec<View> {
    items
        .iter()
        .map(|edu| {
            El::new("div")
                .class("timeline-item")
                .child(El::new("div").class("timeline-marker"))
                .child(
                    El::new("div")
                        .class("timeline-content")
                        .child(
                            El::new("div")
                                .class("timeline-header")
                                .child(El::new("h3").text(or_fallback(&edu.course, "Curso não informado")))
                                .child(status_badge("timeline-status", &edu.status)),
                        )
                        .child(
                            El::new("p")
                                .class("timeline-institution")
                                .text(or_fallback(&edu.institution, "Instituição não informada")),
                        )
                        .child(El::new("p").class("timeline-period").text(education_period(edu)))
                        .child(El::new("span").class("timeline-type").text(or_fallback(&edu.kind, "Formação"))),
                )
                .into()
        })
        .collect()
}

pub fn experience(items: &[Experience]) -> Vec<View> {
    items
        .iter()
        .map(|exp| {
            El::new("div")
                .class("timeline-item experience-item")
                .child(El::new("div").class("timeline-marker"))
                .child(
                    El::new("div")
                        .class("timeline-content")
                        .child(
                            El::new("div")
                                .class("timeline-header")
                                .child(El::new("h3").text(or_fallback(&exp.position, "Posição não informada")))
                                .child(
                                    El::new("span")
                                        .class("timeline-company")
                                        .text(or_fallback(&exp.company, "Empresa não informada")),
                                ),
                        )
                        .child(
                            El::new("p")
                                .class("timeline-period")
                                .text(or_fallback(&exp.period, "Período não informado")),
                        )
                        .child(
                            El::new("p")
                                .class("timeline-description")
                                .text(or_fallback(&exp.description, "Descrição não disponível")),
                        )
                        .child(
                            El::new("div")
                                .class("timeline-technologies")
                                .children(tech_tags(&exp.technologies)),
                        ),
                )
                .into()
        })
        .collect()
}

pub fn projects(items: &[Project]) -> Vec<View> {
    items
        .iter()
        .map(|project| {
            El::new("div")
                .class("project-card")
                .child(
                    El::new("div")
                        .class("project-header")
                        .child(El::new("h3").text(or_fallback(&project.name, "Projeto não informado")))
                        .child(status_badge("project-status", &project.status)),
                )
                .child(
                    El::new("p")
                        .class("project-description")
                        .text(or_fallback(&project.description, "Descrição não disponível")),
                )
                .child(
                    El::new("div")
                        .class("project-technologies")
                        .children(tech_tags(&project.technologies)),
                )
                .child(
                    El::new("div").class("project-actions").child(
                        El::new("a")
                            .attr("href", or_fallback(&project.link, "#"))
                            .attr("target", "_blank")
                            .class("project-link")
                            .child(El::new("span").class("link-icon").text("🔗"))
                            .text(" Ver Projeto"),
                    ),
                )
                .into()
        })
        .collect()
}

pub async fn bind(ctx: &BindContext<'_>) -> Result<()> {
    let profile = ctx.api().get_about_profile().await;
    render(ctx, profile.as_ref())
}

/// Write `profile` into the about slots; `None` shows the error block
pub fn render(ctx: &BindContext<'_>, profile: Option<&AboutProfile>) -> Result<()> {
    let Some(profile) = profile else {
        ctx.fill(PAGE_SLOT, vec![placeholder::error(PROFILE_FAILED)])?;
        return Ok(());
    };

    if let Some(info) = &profile.personal_info {
        ctx.fill("#hero-avatar", vec![avatar(info)])?;
        ctx.set_text("#hero-name", &info.name)?;
        ctx.set_text("#hero-title", &info.title)?;
        if let Some(links) = &profile.social_links {
            ctx.fill("#hero-social", social_links(links))?;
        }
        ctx.fill("#bio-content", vec![bio(info)])?;
    }
    if let Some(items) = &profile.skills {
        ctx.fill("#skills-grid", skills(items))?;
    }
    if let Some(items) = &profile.education {
        ctx.fill("#education-timeline", education(items))?;
    }
    if let Some(items) = &profile.experience {
        ctx.fill("#experience-timeline", experience(items))?;
    }
    if let Some(items) = &profile.projects {
        ctx.fill("#projects-grid", projects(items))?;
    }
    Ok(())
}
