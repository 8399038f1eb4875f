//! Starter content and content export.
//!
//! Seeding fills each content group only while its table is empty, so it can
//! be re-run safely against a live database.

use serde::Serialize;

use crate::entity::{
    about_content, contact_info, project, project_image, service, team_member, testimonial,
};
use crate::store::{
    Store, StoreError,
    about::AboutSectionInput,
    contact::ContactChanges,
    projects::{NewProject, NewProjectImage},
    services::NewService,
    team::NewTeamMember,
};

const SERVICES: &[(&str, &str)] = &[
    (
        "Gyproc et Cloisons",
        "Installation de cloisons en gyproc pour l'aménagement de vos combles. Travail propre et professionnel.",
    ),
    (
        "Enduit et Finitions",
        "Enduit de qualité pour une finition impeccable. Nous garantissons un rendu lisse et uniforme.",
    ),
    (
        "Plafonnage",
        "Plafonnage complet de vos combles avec des matériaux de qualité supérieure.",
    ),
    (
        "Isolation",
        "Isolation laine de bois et laine minérale pour une meilleure efficacité énergétique.",
    ),
    (
        "Retouche sur Plafonnage",
        "Retouches et réparations sur plafonnage existant avec un rendu parfait.",
    ),
];

struct SeedProject {
    title: &'static str,
    description: &'static str,
    /// Directory under `/projects` holding `1.jpg ..= {images}.jpg`.
    dir: &'static str,
    images: usize,
}

const PROJECTS: &[SeedProject] = &[
    SeedProject {
        title: "Restauration Complète d'une Chambre",
        description: "Rénovation intégrale d'une chambre avec gyproc, enduit et finitions impeccables. Transformation d'un espace en pièce de vie moderne et confortable.",
        dir: "chambre",
        images: 7,
    },
    SeedProject {
        title: "Crépi sur Façade",
        description: "Application de crépi de qualité supérieure sur façade. Finition professionnelle garantissant durabilité et esthétique.",
        dir: "crepis",
        images: 4,
    },
    SeedProject {
        title: "Caisson Îlot Central",
        description: "Création d'un caisson de rangement intégré suivant l'îlot central. Travail de précision avec finitions soignées.",
        dir: "caisson",
        images: 6,
    },
    SeedProject {
        title: "Aménagement Suite Parentale",
        description: "Création intégrale d'une chambre parentale dans un grenier non aménagé",
        dir: "suite-parentale",
        images: 3,
    },
];

const ABOUT: &[(&str, &str, &str)] = &[
    (
        "header",
        "À Propos de Nous",
        "Votre partenaire de confiance pour l'aménagement de combles",
    ),
    (
        "who_we_are",
        "Qui Sommes-Nous ?",
        "Rommelaere Rénov est une entreprise spécialisée dans l'aménagement de combles depuis plus de 10 ans. Nous mettons notre expertise et notre passion au service de vos projets de rénovation.",
    ),
    (
        "expertise",
        "Notre Expertise",
        "Nous maîtrisons tous les aspects de l'aménagement de combles :\n- Gyproc et cloisons\n- Enduit et finitions\n- Retouche sur plafonnage\n- Cimentage et travaux de base\n- Crépi sur isolant\n- Plafonnage\n- Isolation laine de bois et laine minérale",
    ),
    (
        "values",
        "Nos Valeurs",
        "Qualité, professionnalisme et satisfaction client sont au cœur de nos valeurs. Nous nous engageons à livrer des travaux impeccables dans les délais convenus.",
    ),
];

const FOUNDER_BIO: &str = "Fondateur et gérant de Rommelaere Rénov, Matthias apporte plus de 10 ans d'expérience dans le domaine de la rénovation et de l'aménagement de combles.\n\nPassionné par son métier, il s'engage à fournir des solutions de qualité supérieure à chacun de ses clients. Son attention aux détails et son professionnalisme font la différence dans chaque projet.\n\nMatthias croit que chaque projet est unique et mérite une approche personnalisée pour garantir la satisfaction totale du client.";

/// Rows inserted by one [`seed`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub services: usize,
    pub projects: usize,
    pub project_images: usize,
    pub about_sections: usize,
    pub team_members: usize,
    pub contact_info: usize,
}

pub async fn seed(store: &Store) -> Result<SeedReport, StoreError> {
    if !store.is_available() {
        return Err(StoreError::Unavailable);
    }
    let mut report = SeedReport::default();

    if store.list_services().await?.is_empty() {
        for (order, (title, description)) in (1..).zip(SERVICES) {
            store
                .create_service(NewService {
                    title: title.to_string(),
                    description: Some(description.to_string()),
                    icon: None,
                    sort_order: order,
                })
                .await?;
            report.services += 1;
        }
    } else {
        tracing::info!("services already present; skipping");
    }

    if store.list_projects().await?.is_empty() {
        for (order, seed) in (1..).zip(PROJECTS) {
            let created = store
                .create_project(NewProject {
                    title: seed.title.to_string(),
                    description: Some(seed.description.to_string()),
                    image_url: Some(format!("/projects/{}/1.jpg", seed.dir)),
                    sort_order: order,
                })
                .await?;
            report.projects += 1;

            for (i, n) in (0..).zip(1..=seed.images) {
                store
                    .create_project_image(
                        created.id,
                        NewProjectImage {
                            image_url: format!("/projects/{}/{n}.jpg", seed.dir),
                            sort_order: i,
                        },
                    )
                    .await?;
                report.project_images += 1;
            }
        }
    } else {
        tracing::info!("projects already present; skipping");
    }

    if store.list_about_content().await?.is_empty() {
        for (section, title, content) in ABOUT {
            store
                .upsert_about_section(
                    section,
                    AboutSectionInput {
                        title: Some(title.to_string()),
                        content: Some(content.to_string()),
                    },
                )
                .await?;
            report.about_sections += 1;
        }
    } else {
        tracing::info!("about content already present; skipping");
    }

    if store.list_team_members().await?.is_empty() {
        store
            .create_team_member(NewTeamMember {
                name: "Matthias Rommelaere".to_string(),
                role: Some("Fondateur et gérant".to_string()),
                bio: Some(FOUNDER_BIO.to_string()),
                image_url: Some("/matthias.png".to_string()),
                sort_order: 1,
            })
            .await?;
        report.team_members += 1;
    } else {
        tracing::info!("team already present; skipping");
    }

    if store.get_contact_info().await?.is_none() {
        store
            .update_contact_info(ContactChanges {
                phone: Some("0472 65 58 73".to_string()),
                email: Some("rommelaere.renov@gmail.com".to_string()),
                address: Some("Belgique".to_string()),
            })
            .await?;
        report.contact_info += 1;
    }

    tracing::info!(?report, "seed finished");
    Ok(report)
}

#[derive(Debug, Serialize)]
pub struct ProjectExport {
    #[serde(flatten)]
    pub project: project::Model,
    pub images: Vec<project_image::Model>,
}

/// Every piece of public content, as one JSON document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentExport {
    pub exported_at: chrono::NaiveDateTime,
    pub services: Vec<service::Model>,
    pub projects: Vec<ProjectExport>,
    pub about: Vec<about_content::Model>,
    pub team: Vec<team_member::Model>,
    pub contact: Option<contact_info::Model>,
    pub testimonials: Vec<testimonial::Model>,
}

pub async fn export(store: &Store) -> Result<ContentExport, StoreError> {
    if !store.is_available() {
        return Err(StoreError::Unavailable);
    }

    let mut projects = Vec::new();
    for project in store.list_projects().await? {
        let images = store.list_project_images(project.id).await?;
        projects.push(ProjectExport { project, images });
    }

    Ok(ContentExport {
        exported_at: chrono::Utc::now().naive_utc(),
        services: store.list_services().await?,
        projects,
        about: store.list_about_content().await?,
        team: store.list_team_members().await?,
        contact: store.get_contact_info().await?,
        testimonials: store.list_testimonials().await?,
    })
}
