use std::sync::Arc;

use axum::{Json, extract::State as AxumState};
use tracing::info;

use crate::{
    models::{Appointment, BookingReceipt, Therapist},
    state::State,
};

pub static THERAPISTS: [Therapist; 9] = [
    Therapist {
        id: 1,
        name: "Dr. Priya Naik",
        specialty: "Cognitive Behavioral Therapy",
        location: "Panaji, Goa",
        availability: "Mon-Wed",
    },
    Therapist {
        id: 2,
        name: "Dr. Rajesh Kamath",
        specialty: "Trauma Therapy",
        location: "Margao, Goa",
        availability: "Tue-Fri",
    },
    Therapist {
        id: 3,
        name: "Dr. Sneha D'Souza",
        specialty: "Family Counseling",
        location: "Vasco da Gama, Goa",
        availability: "Mon-Thu",
    },
    Therapist {
        id: 4,
        name: "Dr. Vikram Shetty",
        specialty: "Depression & Anxiety",
        location: "Mapusa, Goa",
        availability: "Wed-Sat",
    },
    Therapist {
        id: 5,
        name: "Dr. Anisha Pai",
        specialty: "Mindfulness Therapy",
        location: "Ponda, Goa",
        availability: "Mon, Wed, Fri",
    },
    Therapist {
        id: 6,
        name: "Dr. Sunita Verma",
        specialty: "Child Psychology",
        location: "Calangute, Goa",
        availability: "Tue-Thu",
    },
    Therapist {
        id: 7,
        name: "Dr. Manoj Prabhu",
        specialty: "Addiction Counseling",
        location: "Mangalore, Karnataka",
        availability: "Mon-Fri",
    },
    Therapist {
        id: 8,
        name: "Dr. Leela Kamat",
        specialty: "Relationship Therapy",
        location: "Panjim, Goa",
        availability: "Tue, Thu, Sat",
    },
    Therapist {
        id: 9,
        name: "Dr. Rahul Sawant",
        specialty: "Stress Management",
        location: "Mumbai, Maharashtra",
        availability: "Mon-Wed, Fri",
    },
];

pub async fn therapists_handler() -> Json<&'static [Therapist]> {
    Json(THERAPISTS.as_slice())
}

pub async fn appointments_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Json<Vec<Appointment>> {
    Json(state.appointments.read().await.clone())
}

pub async fn book_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(mut appointment): Json<Appointment>,
) -> Json<BookingReceipt> {
    let mut appointments = state.appointments.write().await;

    let id = appointments.len() as u32 + 1;
    appointment.id = Some(id);
    appointments.push(appointment.clone());

    info!("Booked appointment {id} with {}", appointment.therapist_name);

    Json(BookingReceipt {
        message: "Appointment booked",
        appointment,
    })
}
